use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::service::LoginResponse;
use crate::api::error::ErrorResponse;
use crate::api::extract::ValidJson;
use crate::api::state::AppState;
use crate::error::QaResult;
use crate::forum::models::AdminInfo;
use crate::forum::validation::Credentials;

/// Admin created via the bootstrap route
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAdminResponse {
    #[schema(example = "Admin created successfully")]
    pub message: String,
    pub admin: AdminInfo,
}

/// Login admin
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[tracing::instrument(skip_all, fields(username = %credentials.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> QaResult<Json<LoginResponse>> {
    Ok(Json(state.auth.login(credentials).await?))
}

/// Create an admin (bootstrap only)
///
/// POST /api/auth/create-admin
///
/// Mounted only when `auth.allow_admin_bootstrap` is set.
#[utoipa::path(
    post,
    path = "/api/auth/create-admin",
    request_body = Credentials,
    responses(
        (status = 201, description = "Admin created", body = CreateAdminResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[tracing::instrument(skip_all, fields(username = %credentials.username))]
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> QaResult<(StatusCode, Json<CreateAdminResponse>)> {
    let admin = state.auth.create_admin(credentials).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAdminResponse {
            message: "Admin created successfully".to_string(),
            admin,
        }),
    ))
}
