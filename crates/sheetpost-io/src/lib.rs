pub mod csv_file;
pub mod error;
pub mod google;
pub mod smtp;
pub mod source;
pub mod templates;

pub use csv_file::CsvSource;
pub use error::{Result, UpstreamError};
pub use google::GoogleSheetsSource;
pub use smtp::SmtpMailer;
pub use source::{load_records, sheet_name, SheetMetadata, SheetSource};
pub use templates::{TemplateDocument, TemplateStore};

use sheetpost_config::{SourceConfig, SourceProvider};
use std::env;

/// Builds the sheet source selected by `provider`, or by config when unset.
pub fn source_from_config(
    config: &SourceConfig,
    provider: Option<SourceProvider>,
) -> Result<Box<dyn SheetSource>> {
    match provider.unwrap_or(config.provider) {
        SourceProvider::Csv => Ok(Box::new(CsvSource::new())),
        SourceProvider::GoogleSheets => {
            let api_key = env::var(&config.api_key_env).map_err(|_| {
                UpstreamError::Unavailable(format!("missing env var {}", config.api_key_env))
            })?;
            Ok(Box::new(GoogleSheetsSource::new(&config.base_url, api_key)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::source_from_config;
    use sheetpost_config::{SourceConfig, SourceProvider};

    #[test]
    fn csv_provider_needs_no_credentials() {
        let config = SourceConfig::default();
        let source = source_from_config(&config, Some(SourceProvider::Csv)).expect("source");
        assert_eq!(source.source_name(), "csv");
    }

    #[test]
    fn google_provider_requires_api_key_env() {
        let config = SourceConfig {
            api_key_env: "SHEETPOST_TEST_MISSING_KEY".to_string(),
            ..SourceConfig::default()
        };
        std::env::remove_var("SHEETPOST_TEST_MISSING_KEY");
        let err = match source_from_config(&config, Some(SourceProvider::GoogleSheets)) {
            Ok(_) => panic!("expected error"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("SHEETPOST_TEST_MISSING_KEY"));
    }
}
