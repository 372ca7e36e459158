use crate::value::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorKind
///
/// Closed failure taxonomy returned by every mutating operation. The
/// engine never lets an untyped failure past its boundary; transports
/// map these tags to status codes.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    ReferentialIntegrity,
    RequiredFieldMissing,
    Cancelled,
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ReferentialIntegrity => "referential_integrity",
            Self::RequiredFieldMissing => "required_field_missing",
            Self::Cancelled => "cancelled",
            Self::Unexpected => "unexpected",
        };
        write!(f, "{label}")
    }
}

///
/// OpError
///
/// Typed operation failure: a stable kind tag, an operator-facing
/// message, and an optional diagnostics-only detail string. The detail
/// is never intended for end-user display.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{kind}: {message}")]
pub struct OpError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl OpError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a diagnostics detail string.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Construct a pre-persist validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Construct a missing-target failure for a record path and id.
    pub fn not_found(path: &str, id: RecordId) -> Self {
        Self::new(ErrorKind::NotFound, format!("record not found: {path} ({id})"))
    }

    /// Construct a cooperative-cancellation failure.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation cancelled by the caller")
    }

    #[must_use]
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}
