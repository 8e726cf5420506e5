//! Error types for formatting configuration

use regalia_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum FormatError {
    /// Configuration sources could not be merged or extracted
    #[error("Failed to load formatting configuration: {source}")]
    ParseError { source: Box<figment::Error> },

    /// Configuration was read but holds an unusable value
    #[error("Invalid configuration value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<figment::Error> for FormatError {
    fn from(error: figment::Error) -> Self {
        FormatError::ParseError {
            source: Box::new(error),
        }
    }
}

impl Severity for FormatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

/// Result type for configuration loading
pub type FormatResult<T> = Result<T, FormatError>;
