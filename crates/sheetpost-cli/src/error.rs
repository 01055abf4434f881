use anyhow::Error;
use sheetpost_config::ConfigError;
use sheetpost_core::CoreError;
use sheetpost_io::UpstreamError;
use std::io;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

/// Caller-facing category of a failure; drives exit codes and HTTP statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InvalidInput,
    NotFound,
    Failure,
}

impl ErrorClass {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorClass::InvalidInput => EXIT_INVALID_INPUT,
            ErrorClass::NotFound => EXIT_NOT_FOUND,
            ErrorClass::Failure => EXIT_FAILURE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorClass::InvalidInput => "invalid_input",
            ErrorClass::NotFound => "not_found",
            ErrorClass::Failure => "internal",
        }
    }
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(classify(err).exit_code())
}

/// Walks the cause chain and classifies by the first error we recognize.
pub fn classify(err: &Error) -> ErrorClass {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => ErrorClass::InvalidInput,
                CliError::NotFound(_) => ErrorClass::NotFound,
            };
        }
        if let Some(core_err) = cause.downcast_ref::<CoreError>() {
            return core_class(core_err);
        }
        if let Some(upstream_err) = cause.downcast_ref::<UpstreamError>() {
            return upstream_class(upstream_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_class(config_err);
        }
    }
    ErrorClass::Failure
}

fn core_class(err: &CoreError) -> ErrorClass {
    match err {
        CoreError::EmptyInput => ErrorClass::NotFound,
        CoreError::MissingInput(_) | CoreError::NoEligibleRecipients => ErrorClass::InvalidInput,
    }
}

fn upstream_class(err: &UpstreamError) -> ErrorClass {
    match err {
        UpstreamError::Core(core_err) => core_class(core_err),
        UpstreamError::SheetNotFound(_) | UpstreamError::TemplateNotFound(_) => {
            ErrorClass::NotFound
        }
        UpstreamError::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
            ErrorClass::NotFound
        }
        UpstreamError::InvalidTemplateName(_)
        | UpstreamError::MailConfig(_)
        | UpstreamError::Unavailable(_) => ErrorClass::InvalidInput,
        _ => ErrorClass::Failure,
    }
}

fn config_class(err: &ConfigError) -> ErrorClass {
    match err {
        ConfigError::MissingHomeDir => ErrorClass::Failure,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidField { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => ErrorClass::InvalidInput,
    }
}
