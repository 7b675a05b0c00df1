//! Configuration errors raised while building rules, catalogs and field bindings.
//!
//! Per-value failures are never errors; they are reported as
//! [`Violation`](crate::functional::validation_rules::Violation)s inside a
//! [`ValidationOutcome`](crate::functional::validation_engine::ValidationOutcome).

use thiserror::Error;

/// Result alias for registration-time operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Structural problems detected while declaring validations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("format `{0}` is already registered")]
    DuplicateFormat(String),
    #[error("unknown format `{0}`")]
    UnknownFormat(String),
    #[error("format `{0}` declares no pattern, length, numeric or safe text constraint")]
    EmptyRule(String),
    #[error("invalid pattern for format `{format}`: {reason}")]
    InvalidPattern { format: String, reason: String },
    #[error("invalid constraints for format `{format}`: {reason}")]
    InvalidRule { format: String, reason: String },
    #[error("Must define the fields you want to be validated, e.g. {{\"phone\": {{\"format\": \"phone_number\"}}}}")]
    EmptyDeclaration,
    #[error("malformed declaration for `{field}`: {reason}")]
    MalformedDeclaration { field: String, reason: String },
    #[error("option `{option}` on field `{field}` needs a {constraint} constraint, which format `{format}` does not have")]
    OptionMismatch {
        field: String,
        format: String,
        option: &'static str,
        constraint: &'static str,
    },
    #[error("invalid option `{option}` on field `{field}`: {reason}")]
    InvalidOption {
        field: String,
        option: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::MalformedDeclaration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
