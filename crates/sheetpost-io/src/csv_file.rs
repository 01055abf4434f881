use crate::source::{sheet_name, SheetMetadata, SheetSource};
use crate::{Result, UpstreamError};
use sheetpost_core::RawGrid;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads sheets from CSV files on disk.
///
/// A source id naming a file is a one-sheet workbook titled after the file
/// stem, and the sheet part of a range is ignored. A directory is a workbook
/// whose sheets are its `*.csv` files, selected by the range's sheet part.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSource;

impl CsvSource {
    pub fn new() -> Self {
        Self
    }
}

impl SheetSource for CsvSource {
    fn source_name(&self) -> &'static str {
        "csv"
    }

    fn fetch_range(&self, source_id: &str, range: &str) -> Result<RawGrid> {
        let path = resolve_sheet_path(Path::new(source_id), range)?;
        read_grid(&path)
    }

    fn fetch_metadata(&self, source_id: &str) -> Result<SheetMetadata> {
        let path = Path::new(source_id);
        let title = file_stem(path).unwrap_or_else(|| source_id.to_string());
        let sheets = if path.is_dir() {
            list_sheets(path)?
                .into_iter()
                .map(|(name, _)| name)
                .collect()
        } else {
            fs::metadata(path)?;
            vec![title.clone()]
        };
        Ok(SheetMetadata { title, sheets })
    }
}

fn resolve_sheet_path(path: &Path, range: &str) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let sheets = list_sheets(path)?;
    // A sheet named exactly like the range wins over reading it as cells.
    if let Some((_, exact)) = sheets.iter().find(|(name, _)| name == range.trim()) {
        return Ok(exact.clone());
    }
    let sheet = sheet_name(range);
    let found = match sheet {
        Some(sheet) => sheets.into_iter().find(|(name, _)| name == sheet),
        None => sheets.into_iter().next(),
    };
    found.map(|(_, path)| path).ok_or_else(|| {
        UpstreamError::SheetNotFound(sheet.unwrap_or(&path.display().to_string()).to_string())
    })
}

fn list_sheets(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut sheets = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv || !path.is_file() {
            continue;
        }
        if let Some(name) = file_stem(&path) {
            sheets.push((name, path));
        }
    }
    sheets.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(sheets)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

fn read_grid(path: &Path) -> Result<RawGrid> {
    let file = fs::File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    Ok(RawGrid::new(rows))
}

#[cfg(test)]
mod tests {
    use super::CsvSource;
    use crate::source::{load_records, SheetSource};
    use crate::UpstreamError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fetch_range_reads_ragged_rows() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("attendees.csv");
        fs::write(&path, "Name,Email,Certificate\nAda,ada@x.com,https://x/1\nBob\n").expect("write");

        let grid = CsvSource
            .fetch_range(path.to_str().expect("path"), "A:Z")
            .expect("fetch");
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.rows[2], vec!["Bob".to_string()]);
    }

    #[test]
    fn single_file_ignores_sheet_part_of_range() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("attendees.csv");
        fs::write(&path, "Name\nAda\n").expect("write");

        let grid = CsvSource
            .fetch_range(path.to_str().expect("path"), "Sheet1!A1:C")
            .expect("fetch");
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn fetch_range_strips_byte_order_mark() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("bom.csv");
        fs::write(&path, "\u{feff}Name,Email\nAda,ada@x.com\n").expect("write");

        let records = load_records(&CsvSource, path.to_str().expect("path"), "A:Z").expect("load");
        assert_eq!(records[0].get("Name"), Some("Ada"));
    }

    #[test]
    fn directory_sheets_are_selected_by_range() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("Beta.csv"), "Name\nB\n").expect("write");
        fs::write(temp.path().join("Alpha.csv"), "Name\nA\n").expect("write");
        fs::write(temp.path().join("notes.txt"), "ignored").expect("write");
        let id = temp.path().to_str().expect("path");

        let first = CsvSource.fetch_range(id, "A:Z").expect("first sheet");
        assert_eq!(first.rows[1], vec!["A".to_string()]);
        let beta = CsvSource.fetch_range(id, "Beta!A1:C").expect("named sheet");
        assert_eq!(beta.rows[1], vec!["B".to_string()]);

        let meta = CsvSource.fetch_metadata(id).expect("metadata");
        assert_eq!(meta.sheets, vec!["Alpha".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn short_sheet_names_select_their_file() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("Alpha.csv"), "Name\nfrom-alpha\n").expect("write");
        fs::write(temp.path().join("Jan.csv"), "Name\nfrom-jan\n").expect("write");
        fs::write(temp.path().join("Q1.csv"), "Name\nfrom-q1\n").expect("write");
        let id = temp.path().to_str().expect("path");

        let jan = CsvSource.fetch_range(id, "Jan").expect("jan");
        assert_eq!(jan.rows[1], vec!["from-jan".to_string()]);
        let q1 = CsvSource.fetch_range(id, "Q1").expect("q1");
        assert_eq!(q1.rows[1], vec!["from-q1".to_string()]);
        let ranged = CsvSource.fetch_range(id, "Jan!A1:C").expect("jan range");
        assert_eq!(ranged.rows[1], vec!["from-jan".to_string()]);
    }

    #[test]
    fn unknown_sheet_is_reported() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("Alpha.csv"), "Name\n").expect("write");
        let err = CsvSource
            .fetch_range(temp.path().to_str().expect("path"), "Gamma!A:Z")
            .unwrap_err();
        assert!(matches!(err, UpstreamError::SheetNotFound(name) if name == "Gamma"));
    }

    #[test]
    fn empty_file_loads_as_no_data() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("empty.csv");
        fs::write(&path, "").expect("write");
        let err = load_records(&CsvSource, path.to_str().expect("path"), "A:Z").unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Core(sheetpost_core::CoreError::EmptyInput)
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("missing.csv");
        let err = CsvSource
            .fetch_range(path.to_str().expect("path"), "A:Z")
            .unwrap_err();
        assert!(
            matches!(err, UpstreamError::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound)
        );
    }
}
