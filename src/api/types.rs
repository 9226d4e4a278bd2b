//! Response payloads shared by the handlers and the HTTP client.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `GET /questions` query string
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Case-insensitive substring; blank means no filter
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionCreated {
    #[schema(example = "Question created successfully")]
    pub message: String,
    #[schema(example = 1)]
    pub question_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionDeleted {
    #[schema(example = "Question deleted successfully")]
    pub message: String,
    pub question_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerCreated {
    #[schema(example = "Answer created successfully")]
    pub message: String,
    #[schema(example = 1)]
    pub answer_id: i64,
}

/// Result of editing or deleting an answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerChanged {
    #[schema(example = "Answer updated successfully")]
    pub message: String,
    pub answer_id: i64,
    pub question_id: i64,
}
