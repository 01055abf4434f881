use crate::Result;
use serde::Serialize;
use sheetpost_core::{normalize, RawGrid, Record};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetMetadata {
    pub title: String,
    pub sheets: Vec<String>,
}

pub trait SheetSource: Send + Sync {
    fn source_name(&self) -> &'static str;
    fn fetch_range(&self, source_id: &str, range: &str) -> Result<RawGrid>;
    fn fetch_metadata(&self, source_id: &str) -> Result<SheetMetadata>;
}

/// Fetches a range and turns it into records, header taken from row 0.
pub fn load_records(source: &dyn SheetSource, source_id: &str, range: &str) -> Result<Vec<Record>> {
    let grid = source.fetch_range(source_id, range)?;
    debug!(
        source = source.source_name(),
        id = source_id,
        range,
        rows = grid.len(),
        "fetched sheet range"
    );
    Ok(normalize(&grid, None)?)
}

/// Sheet part of an A1 range (`Contacts!A1:C` -> `Contacts`).
///
/// A range with no `!` is a sheet name unless it reads as a bare cell range.
/// A lone token only counts as a cell when it carries a row number, so `Jan`
/// names a sheet while `B2` does not.
pub fn sheet_name(range: &str) -> Option<&str> {
    let range = range.trim();
    let sheet = match range.rsplit_once('!') {
        Some((sheet, _)) => sheet,
        None if is_cell_range(range) => return None,
        None => range,
    };
    let sheet = sheet
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(sheet)
        .trim();
    (!sheet.is_empty()).then_some(sheet)
}

fn is_cell_range(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if value.contains(':') {
        return value.split(':').all(is_cell_ref);
    }
    is_cell_ref(value) && value.chars().any(|c| c.is_ascii_digit())
}

fn is_cell_ref(part: &str) -> bool {
    let part = part.replace('$', "");
    let letters = part.chars().take_while(char::is_ascii_alphabetic).count();
    let digits = &part[letters..];
    !part.is_empty() && letters <= 3 && digits.chars().all(|c| c.is_ascii_digit())
}
