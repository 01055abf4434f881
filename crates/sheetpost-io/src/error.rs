use sheetpost_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("sheet not found: {0}")]
    SheetNotFound(String),
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("invalid template name: {0}")]
    InvalidTemplateName(String),
    #[error("invalid mail settings: {0}")]
    MailConfig(String),
    #[error("mail delivery failed: {0}")]
    Mail(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "sheets-api")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "sheets-api")]
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, UpstreamError>;
