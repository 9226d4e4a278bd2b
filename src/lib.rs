//! qa_board - Q&A forum
//!
//! Visitors post questions, authenticated admins answer them.
//!
//! # Modules
//!
//! - [`forum`] - Questions, answers, validation, search and the store seam
//! - [`auth`] - Admin login, JWT issuance and the bearer-token middleware
//! - [`api`] - axum router, handlers and OpenAPI document
//! - [`client`] - HTTP client, persisted session and searchable snapshot
//! - [`db`] - PostgreSQL pool and schema
//! - [`config`] / [`logging`] - YAML configuration and tracing setup

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod forum;
pub mod logging;

// Convenient re-exports at crate root
pub use error::{ErrorKind, FieldError, QaError, QaResult};
pub use forum::{Answer, NewQuestion, QaService, QaStore, Question};
