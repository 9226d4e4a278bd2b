use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use std::sync::Arc;

use crate::api::error::ErrorResponse;
use crate::api::extract::{ValidJson, ValidPath};
use crate::api::state::AppState;
use crate::api::types::{AnswerChanged, AnswerCreated};
use crate::auth::Principal;
use crate::error::QaResult;
use crate::forum::validation::AnswerInput;

#[utoipa::path(
    post,
    path = "/api/questions/{id}/answers",
    params(("id" = i64, Path, description = "Question id")),
    request_body = AnswerInput,
    responses(
        (status = 201, description = "Answer created", body = AnswerCreated),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing token", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Answers"
)]
#[tracing::instrument(skip_all, fields(question_id = question_id, admin_id = principal.id, payload = ?input))]
pub async fn create_answer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    ValidPath(question_id): ValidPath<i64>,
    ValidJson(input): ValidJson<AnswerInput>,
) -> QaResult<(StatusCode, Json<AnswerCreated>)> {
    let answer_id = state.qa.create_answer(question_id, input, &principal).await?;
    Ok((
        StatusCode::CREATED,
        Json(AnswerCreated {
            message: "Answer created successfully".to_string(),
            answer_id,
        }),
    ))
}

/// Edit an answer (author only)
#[utoipa::path(
    put,
    path = "/api/answers/{id}",
    params(("id" = i64, Path, description = "Answer id")),
    request_body = AnswerInput,
    responses(
        (status = 200, description = "Answer updated", body = AnswerChanged),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Invalid token or not the author", body = ErrorResponse),
        (status = 404, description = "Answer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Answers"
)]
#[tracing::instrument(skip_all, fields(answer_id = answer_id, admin_id = principal.id, payload = ?input))]
pub async fn update_answer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    ValidPath(answer_id): ValidPath<i64>,
    ValidJson(input): ValidJson<AnswerInput>,
) -> QaResult<Json<AnswerChanged>> {
    let r = state.qa.update_answer(answer_id, input, &principal).await?;
    Ok(Json(AnswerChanged {
        message: "Answer updated successfully".to_string(),
        answer_id: r.answer_id,
        question_id: r.question_id,
    }))
}

/// Delete an answer (author only)
#[utoipa::path(
    delete,
    path = "/api/answers/{id}",
    params(("id" = i64, Path, description = "Answer id")),
    responses(
        (status = 200, description = "Answer deleted", body = AnswerChanged),
        (status = 403, description = "Invalid token or not the author", body = ErrorResponse),
        (status = 404, description = "Answer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Answers"
)]
#[tracing::instrument(skip(state, principal), fields(admin_id = principal.id))]
pub async fn delete_answer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    ValidPath(answer_id): ValidPath<i64>,
) -> QaResult<Json<AnswerChanged>> {
    let r = state.qa.delete_answer(answer_id, &principal).await?;
    Ok(Json(AnswerChanged {
        message: "Answer deleted successfully".to_string(),
        answer_id: r.answer_id,
        question_id: r.question_id,
    }))
}
