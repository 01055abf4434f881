use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("no data found")]
    EmptyInput,
    #[error("{0} is required")]
    MissingInput(&'static str),
    #[error("no eligible recipients: every contact lacks a valid email or a required certificate link")]
    NoEligibleRecipients,
}

pub type Result<T> = std::result::Result<T, CoreError>;
