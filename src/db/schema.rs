//! Table definitions. Applied at startup; every statement is idempotent.

use anyhow::{Context, Result};
use sqlx::PgPool;

const CREATE_ADMINS: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id BIGSERIAL PRIMARY KEY,
    username VARCHAR(50) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const CREATE_QUESTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id BIGSERIAL PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    content TEXT NOT NULL,
    author_name VARCHAR(100) NOT NULL,
    author_email VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const CREATE_ANSWERS: &str = r#"
CREATE TABLE IF NOT EXISTS answers (
    id BIGSERIAL PRIMARY KEY,
    question_id BIGINT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    admin_id BIGINT NOT NULL REFERENCES admins(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const CREATE_ANSWERS_QUESTION_IDX: &str =
    "CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id)";

const STATEMENTS: &[(&str, &str)] = &[
    ("admins", CREATE_ADMINS),
    ("questions", CREATE_QUESTIONS),
    ("answers", CREATE_ANSWERS),
    ("idx_answers_question_id", CREATE_ANSWERS_QUESTION_IDX),
];

pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for (name, ddl) in STATEMENTS {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create {name}"))?;
    }
    tracing::info!("Database schema ready");
    Ok(())
}
