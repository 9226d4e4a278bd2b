//! HTTP mapping of [`QaError`].
//!
//! Body shape: `{code, error, message, details?}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use utoipa::ToSchema;

use crate::error::{FieldError, QaError};

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Set once at startup from `expose_internal_errors`.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::Relaxed);
}

/// JSON response body for errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = 1001)]
    pub code: i32,
    #[schema(example = "VALIDATION_ERROR")]
    pub error: String,
    #[schema(example = "Input validation failed")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl From<&QaError> for ErrorResponse {
    fn from(err: &QaError) -> Self {
        let kind = err.kind();
        let message = match err {
            QaError::Internal(_) if !EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed) => {
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        Self {
            code: kind.code(),
            error: kind.name().to_string(),
            message,
            details: err.field_errors().to_vec(),
        }
    }
}

impl IntoResponse for QaError {
    fn into_response(self) -> Response {
        if let QaError::Internal(detail) = &self {
            // The request span supplies method, route and payload fields.
            tracing::error!(error = %detail, "Request failed");
        }
        let status = StatusCode::from_u16(self.kind().http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
