//! Error types.
//!
//! Two classes of failure exist and they never mix:
//!
//! * [`ConfigError`] – a mistake in how a form type was declared (malformed
//!   annotation, a slot list that does not line up with the declared fields,
//!   uploaded files bound to a text field). These are programming errors;
//!   call [`crate::prepare`] at startup so they surface before the first
//!   request.
//! * Everything else wrapped by [`BindError`] – expected, per-request
//!   outcomes that should be echoed back to the end user.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// A form type was declared incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid `{key}` annotation on field `{field}`: expected an integer, got {value:?}")]
    InvalidInteger {
        field: &'static str,
        key: &'static str,
        value: &'static str,
    },
    #[error(
        "invalid `{key}` annotation on field `{field}`: expected two whitespace-separated integers, got {value:?}"
    )]
    InvalidRange {
        field: &'static str,
        key: &'static str,
        value: &'static str,
    },
    #[error("field `{field}` cannot receive uploaded files")]
    NotAFileField { field: String },
    #[error("form `{form}` declares {declared} fields but exposes {slots} slots")]
    SlotMismatch {
        form: &'static str,
        declared: usize,
        slots: usize,
    },
}

/// A raw string could not be converted into the destination field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("invalid integer {value:?}: {source}")]
    Int {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid number {value:?}: {source}")]
    Float {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("invalid date/time {value:?} for format {format:?}: {source}")]
    Temporal {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("{0}")]
    Custom(String),
    #[error("unsupported field type")]
    Unsupported,
}

impl CoerceError {
    /// Wrap the failure reported by a user type's own parser.
    pub fn custom(err: impl std::fmt::Display) -> Self {
        CoerceError::Custom(err.to_string())
    }
}

/// Failures of the request-transport layer (multipart decoding).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request body is not multipart/form-data")]
    NotMultipart,
    #[error("malformed multipart body: {0}")]
    Malformed(String),
    #[error("multipart body exceeds the in-memory limit of {limit} bytes")]
    TooLarge { limit: u64 },
}

/// The single error surfaced by a read operation.
///
/// Reads stop at the first failure in field-declaration order, so exactly one
/// of these is ever reported per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A validator rejected the raw value.
    #[error("{label}（{message}）")]
    Rejected {
        field: String,
        label: String,
        message: String,
    },
    /// The raw value passed validation but could not be converted.
    #[error("{label}（{source}）")]
    Coerce {
        field: String,
        label: String,
        #[source]
        source: CoerceError,
    },
    #[error("no file upload")]
    NoFileUpload,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl BindError {
    /// `true` when the failure is a declaration mistake rather than bad input.
    pub fn is_config(&self) -> bool {
        matches!(self, BindError::Config(_))
    }

    /// External name of the field that failed, when the failure is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            BindError::Rejected { field, .. } | BindError::Coerce { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T, E = BindError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_renders_label_and_message() {
        let err = BindError::Rejected {
            field: "user_name".into(),
            label: "Name".into(),
            message: "required".into(),
        };
        assert_eq!(err.to_string(), "Name（required）");
        assert_eq!(err.field(), Some("user_name"));
        assert!(!err.is_config());
    }

    #[test]
    fn config_errors_are_flagged() {
        let err: BindError = ConfigError::NotAFileField {
            field: "avatar".into(),
        }
        .into();
        assert!(err.is_config());
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "field `avatar` cannot receive uploaded files");
    }

    #[test]
    fn coerce_error_keeps_source() {
        let source = "x1".parse::<i32>().unwrap_err();
        let err = BindError::Coerce {
            field: "age".into(),
            label: "Age".into(),
            source: CoerceError::Int {
                value: "x1".into(),
                source,
            },
        };
        assert!(err.to_string().starts_with("Age（invalid integer \"x1\""));
        assert!(std::error::Error::source(&err).is_some());
    }
}
