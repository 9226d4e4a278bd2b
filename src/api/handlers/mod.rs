pub mod answers;
pub mod health;
pub mod questions;

pub use answers::{create_answer, delete_answer, update_answer};
pub use health::{HealthResponse, health_check};
pub use questions::{create_question, delete_question, get_question, list_questions};

use crate::error::QaError;

/// JSON 404 for unmatched routes
pub async fn not_found() -> QaError {
    QaError::NotFound("Route")
}
