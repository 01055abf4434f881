use crate::error::{CoreError, Result};

/// Rows of cell strings as fetched from a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    pub rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<String>>> for RawGrid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// One data row keyed by column header.
///
/// Keys keep the position of their first occurrence; a repeated header
/// overwrites the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        match self.fields.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::default();
        for (key, value) in iter {
            record.insert(key.into(), value.into());
        }
        record
    }
}

/// Turns a grid into records.
///
/// Without `explicit_header`, row 0 is the header and the remaining rows are
/// data. Missing trailing cells read as `""`; cells past the header width
/// are ignored.
pub fn normalize(grid: &RawGrid, explicit_header: Option<&[String]>) -> Result<Vec<Record>> {
    let Some((first, rest)) = grid.rows.split_first() else {
        return Err(CoreError::EmptyInput);
    };

    let (header, data) = match explicit_header {
        Some(header) => (header, grid.rows.as_slice()),
        None => (first.as_slice(), rest),
    };

    let records: Vec<Record> = data
        .iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    let value = row.get(index).cloned().unwrap_or_default();
                    (name.clone(), value)
                })
                .collect::<Record>()
        })
        .collect();
    Ok(records)
}
