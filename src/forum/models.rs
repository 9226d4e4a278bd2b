//! Data models for questions, answers and admins

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Administrator credential record (never serialized to clients)
#[derive(Debug, Clone, FromRow)]
pub struct AdminRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of an admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminInfo {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "admin")]
    pub username: String,
}

impl From<&AdminRecord> for AdminInfo {
    fn from(r: &AdminRecord) -> Self {
        Self {
            id: r.id,
            username: r.username.clone(),
        }
    }
}

/// Answer with its author's username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    #[schema(example = "Try upgrading to version 2")]
    pub content: String,
    pub admin_id: i64,
    #[schema(example = "admin")]
    pub admin_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    /// An answer counts as edited once its update time moved past creation.
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

/// Question with nested answers (oldest answer first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Question {
    pub id: i64,
    #[schema(example = "How do I configure X?")]
    pub title: String,
    #[schema(example = "I keep getting error Y when running Z")]
    pub content: String,
    #[schema(example = "Alice")]
    pub author_name: String,
    pub author_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Ownership facts needed to authorize an answer mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct AnswerOwner {
    pub admin_id: i64,
    pub question_id: i64,
}

/// Result of an ownership-guarded answer mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMutation {
    /// Applied; carries the parent question id
    Applied { question_id: i64 },
    NotFound,
    NotOwner,
}
