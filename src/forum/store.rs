//! Storage seam for admins, questions and answers.
//!
//! [`PgStore`](super::pg_store::PgStore) is the production implementation;
//! [`MemoryStore`](super::memory_store::MemoryStore) backs development mode
//! and tests. Both must uphold the same invariants: answers reference an
//! existing question and admin, deleting a question removes its answers,
//! and answer mutations are guarded by the owning admin id.

use async_trait::async_trait;
use thiserror::Error;

use super::models::{AdminRecord, AnswerMutation, AnswerOwner, Question};
use super::search::SearchTerm;
use super::validation::NewQuestion;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique key violation; carries the entity name
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// Foreign key target vanished; carries the entity name
    #[error("{0} does not exist")]
    MissingReference(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait QaStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Liveness probe used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminRecord>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the username is taken.
    async fn insert_admin(&self, username: &str, password_hash: &str) -> Result<i64, StoreError>;

    /// Newest question first, answers oldest first. `filter` narrows the
    /// result with the shared substring match.
    async fn list_questions(&self, filter: Option<&SearchTerm>)
    -> Result<Vec<Question>, StoreError>;

    async fn get_question(&self, id: i64) -> Result<Option<Question>, StoreError>;

    /// Input must already be validated and normalized.
    async fn insert_question(&self, input: &NewQuestion) -> Result<i64, StoreError>;

    /// Returns false when no such question existed.
    async fn delete_question(&self, id: i64) -> Result<bool, StoreError>;

    async fn question_exists(&self, id: i64) -> Result<bool, StoreError>;

    /// Fails with [`StoreError::MissingReference`] if the question is gone.
    async fn insert_answer(
        &self,
        question_id: i64,
        admin_id: i64,
        content: &str,
    ) -> Result<i64, StoreError>;

    async fn find_answer_owner(&self, answer_id: i64) -> Result<Option<AnswerOwner>, StoreError>;

    /// Ownership predicate is part of the write itself.
    async fn update_answer(
        &self,
        answer_id: i64,
        admin_id: i64,
        content: &str,
    ) -> Result<AnswerMutation, StoreError>;

    async fn delete_answer(
        &self,
        answer_id: i64,
        admin_id: i64,
    ) -> Result<AnswerMutation, StoreError>;
}
