//! Error types shared by the Regalia crates
//!
//! Rendering has exactly one class of hard failure: a helper was called with
//! an argument shape it cannot interpret. Everything that depends on outside
//! data (missing translations, unreadable attributes) degrades to blank output
//! instead and never reaches this module.

use std::io;
use thiserror::Error as ThisError;

/// Severity levels for error classification
///
/// - **Warning**: Potential issue but rendering can proceed (a translation
///   file that does not exist leaves humanized captions in place).
/// - **Error**: The current helper call failed; the enclosing block aborts.
/// - **Critical**: The rendering environment itself is unusable (for example a
///   translation catalog that cannot be parsed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but the system can continue
    Error,
    /// System cannot continue, requires immediate attention
    Critical,
}

/// Trait for error types that have severity levels
///
/// ```rust
/// use regalia_common::{ErrorSeverity, RegaliaError, Severity};
///
/// let error = RegaliaError::argument("static_text", "title is required");
/// assert_eq!(error.severity(), ErrorSeverity::Error);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, RegaliaError>;

/// Errors raised by Regalia helpers
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum RegaliaError {
    /// A helper was called with an unsupported argument shape
    #[error("invalid arguments for {operation}: {message}")]
    Argument {
        /// The helper that rejected its arguments
        operation: String,
        /// What was wrong with them
        message: String,
    },

    /// A model name was used that was never registered
    #[error("unknown model: {name}")]
    UnknownModel { name: String },

    /// A translation catalog could not be loaded
    #[error("translation catalog error: {message}")]
    Translation { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl RegaliaError {
    /// Build an [`RegaliaError::Argument`] for the given helper.
    pub fn argument(operation: impl Into<String>, message: impl Into<String>) -> Self {
        RegaliaError::Argument {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether this error stems from a malformed call.
    pub fn is_argument(&self) -> bool {
        matches!(self, RegaliaError::Argument { .. })
    }
}

impl Severity for RegaliaError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RegaliaError::Argument { .. } => ErrorSeverity::Error,
            RegaliaError::UnknownModel { .. } => ErrorSeverity::Error,
            RegaliaError::Translation { .. } => ErrorSeverity::Critical,
            RegaliaError::Io(e) if e.kind() == io::ErrorKind::NotFound => ErrorSeverity::Warning,
            RegaliaError::Io(_) => ErrorSeverity::Critical,
            RegaliaError::Yaml(_) => ErrorSeverity::Critical,
        }
    }
}
