use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::api::error::ErrorResponse;
use crate::api::extract::{ValidJson, ValidPath};
use crate::api::state::AppState;
use crate::api::types::{ListQuery, QuestionCreated, QuestionDeleted};
use crate::auth::Principal;
use crate::error::QaResult;
use crate::forum::models::Question;
use crate::forum::validation::NewQuestion;

/// List questions with their answers
///
/// Newest question first; answers oldest first.
#[utoipa::path(
    get,
    path = "/api/questions",
    params(ListQuery),
    responses(
        (status = 200, description = "All questions", body = Vec<Question>)
    ),
    tag = "Questions"
)]
#[tracing::instrument(skip_all, fields(q = query.q.as_deref()))]
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> QaResult<Json<Vec<Question>>> {
    Ok(Json(state.qa.list_questions(query.q.as_deref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question with answers", body = Question),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    tag = "Questions"
)]
#[tracing::instrument(skip(state))]
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i64>,
) -> QaResult<Json<Question>> {
    Ok(Json(state.qa.get_question(id).await?))
}

/// Submit a question (public)
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = NewQuestion,
    responses(
        (status = 201, description = "Question created", body = QuestionCreated),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Questions"
)]
#[tracing::instrument(skip_all, fields(payload = ?input))]
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<NewQuestion>,
) -> QaResult<(StatusCode, Json<QuestionCreated>)> {
    let question_id = state.qa.create_question(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(QuestionCreated {
            message: "Question created successfully".to_string(),
            question_id,
        }),
    ))
}

/// Delete a question and all its answers (any admin)
#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question deleted", body = QuestionDeleted),
        (status = 401, description = "Missing token", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Questions"
)]
#[tracing::instrument(skip(state, principal), fields(admin_id = principal.id))]
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    ValidPath(id): ValidPath<i64>,
) -> QaResult<Json<QuestionDeleted>> {
    state.qa.delete_question(id, &principal).await?;
    Ok(Json(QuestionDeleted {
        message: "Question deleted successfully".to_string(),
        question_id: id,
    }))
}
