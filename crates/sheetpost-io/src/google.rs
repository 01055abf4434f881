use crate::source::SheetMetadata;
use serde::Deserialize;
use sheetpost_core::RawGrid;

#[cfg(not(feature = "sheets-api"))]
use crate::source::SheetSource;
#[cfg(not(feature = "sheets-api"))]
use crate::{Result, UpstreamError};

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    properties: SheetProperties,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(default)]
    title: String,
}

fn grid_from_values(range: ValueRange) -> RawGrid {
    let rows: Vec<Vec<String>> = range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect::<Vec<_>>())
        .collect();
    RawGrid::new(rows)
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn metadata_from_spreadsheet(doc: Spreadsheet) -> SheetMetadata {
    SheetMetadata {
        title: doc.properties.title,
        sheets: doc
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect(),
    }
}

#[cfg(feature = "sheets-api")]
mod imp {
    use super::{grid_from_values, metadata_from_spreadsheet, Spreadsheet, ValueRange};
    use crate::source::{SheetMetadata, SheetSource};
    use crate::{Result, UpstreamError};
    use reqwest::blocking::Client;
    use sheetpost_core::RawGrid;
    use std::time::Duration;
    use url::Url;

    /// Google Sheets v4 values API, authenticated with an API key.
    #[derive(Debug, Clone)]
    pub struct GoogleSheetsSource {
        base_url: String,
        api_key: String,
        client: Client,
    }

    impl GoogleSheetsSource {
        pub fn new(base_url: &str, api_key: String) -> Result<Self> {
            if api_key.trim().is_empty() {
                return Err(UpstreamError::Unavailable(
                    "google sheets api key is empty".to_string(),
                ));
            }
            let client = Client::builder()
                .user_agent("sheetpost")
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                client,
            })
        }

        pub(super) fn spreadsheet_url(&self, source_id: &str, tail: &[&str]) -> Result<Url> {
            let mut url = Url::parse(&self.base_url)?;
            url.path_segments_mut()
                .map_err(|_| UpstreamError::Parse("sheets base url cannot be a base".to_string()))?
                .pop_if_empty()
                .extend(["v4", "spreadsheets", source_id])
                .extend(tail);
            url.query_pairs_mut().append_pair("key", &self.api_key);
            Ok(url)
        }
    }

    impl SheetSource for GoogleSheetsSource {
        fn source_name(&self) -> &'static str {
            "google-sheets"
        }

        fn fetch_range(&self, source_id: &str, range: &str) -> Result<RawGrid> {
            let mut url = self.spreadsheet_url(source_id, &["values", range])?;
            url.query_pairs_mut().append_pair("majorDimension", "ROWS");
            let body: ValueRange = self.client.get(url).send()?.error_for_status()?.json()?;
            Ok(grid_from_values(body))
        }

        fn fetch_metadata(&self, source_id: &str) -> Result<SheetMetadata> {
            let mut url = self.spreadsheet_url(source_id, &[])?;
            url.query_pairs_mut()
                .append_pair("fields", "properties.title,sheets.properties.title");
            let body: Spreadsheet = self.client.get(url).send()?.error_for_status()?.json()?;
            Ok(metadata_from_spreadsheet(body))
        }
    }
}

#[cfg(feature = "sheets-api")]
pub use imp::GoogleSheetsSource;

#[cfg(not(feature = "sheets-api"))]
#[derive(Debug, Clone)]
pub struct GoogleSheetsSource {
    _private: (),
}

#[cfg(not(feature = "sheets-api"))]
impl GoogleSheetsSource {
    pub fn new(_base_url: &str, _api_key: String) -> Result<Self> {
        Err(unavailable())
    }
}

#[cfg(not(feature = "sheets-api"))]
impl SheetSource for GoogleSheetsSource {
    fn source_name(&self) -> &'static str {
        "google-sheets"
    }

    fn fetch_range(&self, _source_id: &str, _range: &str) -> Result<RawGrid> {
        Err(unavailable())
    }

    fn fetch_metadata(&self, _source_id: &str) -> Result<SheetMetadata> {
        Err(unavailable())
    }
}

#[cfg(not(feature = "sheets-api"))]
fn unavailable() -> UpstreamError {
    UpstreamError::Unavailable("google sheets requires the sheets-api feature".to_string())
}

#[cfg(test)]
mod tests {
    use super::{grid_from_values, metadata_from_spreadsheet, Spreadsheet, ValueRange};

    #[test]
    fn values_response_becomes_grid() {
        let body: ValueRange = serde_json::from_str(
            r#"{"range":"Sheet1!A1:C3","majorDimension":"ROWS",
                "values":[["Name","Email"],["Ada","ada@x.com",7],[null,true]]}"#,
        )
        .expect("parse");
        let grid = grid_from_values(body);
        assert_eq!(grid.rows[0], vec!["Name", "Email"]);
        assert_eq!(grid.rows[1], vec!["Ada", "ada@x.com", "7"]);
        assert_eq!(grid.rows[2], vec!["", "true"]);
    }

    #[test]
    fn empty_range_has_no_values_key() {
        let body: ValueRange = serde_json::from_str(r#"{"range":"Sheet1!A1:C3"}"#).expect("parse");
        assert!(grid_from_values(body).is_empty());
    }

    #[test]
    fn spreadsheet_response_becomes_metadata() {
        let doc: Spreadsheet = serde_json::from_str(
            r#"{"properties":{"title":"Workshop"},
                "sheets":[{"properties":{"title":"Attendees"}},{"properties":{"title":"Staff"}}]}"#,
        )
        .expect("parse");
        let meta = metadata_from_spreadsheet(doc);
        assert_eq!(meta.title, "Workshop");
        assert_eq!(meta.sheets, vec!["Attendees", "Staff"]);
    }

    #[cfg(feature = "sheets-api")]
    #[test]
    fn urls_encode_range_and_key() {
        let source = super::GoogleSheetsSource::new("https://sheets.example.com/", "k3y".to_string())
            .expect("source");
        let url = source
            .spreadsheet_url("abc", &["values", "Sheet 1!A:Z"])
            .expect("url");
        assert!(url
            .as_str()
            .starts_with("https://sheets.example.com/v4/spreadsheets/abc/values/Sheet%201!A:Z"));
        assert!(url.as_str().ends_with("?key=k3y"));
    }

    #[cfg(feature = "sheets-api")]
    #[test]
    fn blank_api_key_is_rejected() {
        assert!(super::GoogleSheetsSource::new("https://sheets.example.com", " ".to_string()).is_err());
    }
}
