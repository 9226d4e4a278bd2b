//! Domain error taxonomy.
//!
//! Every failure a Q&A operation can produce maps onto one [`QaError`]
//! variant. [`ErrorKind`] carries the stable wire code, name and HTTP status;
//! the axum `IntoResponse` impl lives in `api::error`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-field validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "title")]
    pub field: String,
    #[schema(example = "title must be between 5 and 255 characters")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error categories with their wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorKind {
    /// 1001: malformed or out-of-range input
    Validation = 1001,
    /// 2001: no bearer token presented
    Unauthenticated = 2001,
    /// 2002: login rejected
    Unauthorized = 2002,
    /// 2003: bad signature or expired token
    InvalidToken = 2003,
    /// 2004: caller does not own the resource
    Forbidden = 2004,
    /// 4004: referenced entity absent
    NotFound = 4004,
    /// 4009: duplicate unique key
    Conflict = 4009,
    /// 5000: unexpected store/runtime failure
    Internal = 5000,
}

impl ErrorKind {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code as a plain number (the axum mapping wraps it).
    pub fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Unauthenticated | Self::Unauthorized => 401,
            Self::InvalidToken | Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

/// Q&A domain error.
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error("Input validation failed")]
    Validation(Vec<FieldError>),

    #[error("Access token required")]
    Unauthenticated,

    /// Same message for unknown username and wrong password.
    #[error("Invalid username or password")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::InvalidToken => ErrorKind::InvalidToken,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Single-field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Field errors carried by a validation failure, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(fields) => fields,
            _ => &[],
        }
    }
}

impl From<crate::forum::store::StoreError> for QaError {
    fn from(err: crate::forum::store::StoreError) -> Self {
        use crate::forum::store::StoreError;
        match err {
            StoreError::Duplicate(what) => QaError::Conflict(format!("{} already exists", what)),
            StoreError::MissingReference(what) => QaError::NotFound(what),
            StoreError::Database(e) => QaError::Internal(e.to_string()),
        }
    }
}

pub type QaResult<T> = Result<T, QaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::Validation.code(), 1001);
        assert_eq!(ErrorKind::Internal.code(), 5000);
    }

    #[test]
    fn test_http_status() {
        assert_eq!(QaError::Unauthenticated.kind().http_status(), 401);
        assert_eq!(QaError::Unauthorized.kind().http_status(), 401);
        assert_eq!(QaError::InvalidToken.kind().http_status(), 403);
        assert_eq!(QaError::Forbidden("nope").kind().http_status(), 403);
        assert_eq!(QaError::NotFound("Question").kind().http_status(), 404);
        assert_eq!(QaError::Conflict("x".into()).kind().http_status(), 409);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(QaError::NotFound("Answer").to_string(), "Answer not found");
    }

    #[test]
    fn test_store_duplicate_maps_to_conflict() {
        let err: QaError = crate::forum::store::StoreError::Duplicate("Admin").into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("Admin"));
    }

    #[test]
    fn test_field_errors() {
        let err = QaError::invalid("content", "too short");
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "content");
        assert!(QaError::Unauthenticated.field_errors().is_empty());
    }
}
