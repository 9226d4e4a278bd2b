//! Health check handler

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::state::AppState;

/// Health check response data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    /// Crate version and build hash
    #[schema(example = "0.1.0-abc1234")]
    pub version: String,
}

pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH"));

/// Health check endpoint
///
/// - Healthy: 200 OK + {status: "OK", ...}
/// - Store unreachable: 503 Service Unavailable + {status: "UNAVAILABLE", ...}
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.store().ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("[HEALTH] {} store ping failed: {}", state.store().name(), e);
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now(),
            uptime_secs: state.uptime_secs(),
            version: VERSION.to_string(),
        }),
    )
}
