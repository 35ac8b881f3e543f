//! Error types for ergosig
//!
//! All fallible operations return `Result<T, Error>`.
//! Errors carry the offending spec so a bad field can be found in a long list.

use crate::signature::FieldRole;

/// ergosig error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required side of the signature was not supplied
    #[error("Missing spec: no {role} fields were supplied")]
    MissingSpecError { role: FieldRole },

    /// A field spec could not be decomposed by the grammar
    #[error("Malformed spec {spec}: {reason}")]
    MalformedSpecError { spec: String, reason: String },

    /// The same field name was declared twice in one signature
    #[error("Duplicate field '{name}': already declared as {first}, redeclared as {second}")]
    DuplicateFieldError {
        name: String,
        first: FieldRole,
        second: FieldRole,
    },

    /// Build options could not be loaded
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl Error {
    pub(crate) fn malformed(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedSpecError {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Re-point a malformed-spec error at the enclosing field spec.
    ///
    /// Type expressions are parsed on their own; once the failure bubbles up
    /// to the field parser the whole field is the more useful thing to show.
    pub(crate) fn within(self, field_spec: &str) -> Self {
        match self {
            Error::MalformedSpecError { spec, reason } => Error::MalformedSpecError {
                spec: format!("{:?}", field_spec),
                reason: format!("in type expression {:?}: {}", spec, reason),
            },
            other => other,
        }
    }
}

/// Result type alias for ergosig operations
pub type Result<T> = std::result::Result<T, Error>;
