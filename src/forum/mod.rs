//! Forum domain: questions, answers and the admins who answer them.

pub mod memory_store;
pub mod models;
pub mod pg_store;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

pub use memory_store::MemoryStore;
pub use models::{AdminInfo, AdminRecord, Answer, AnswerMutation, AnswerOwner, Question};
pub use pg_store::PgStore;
pub use search::SearchTerm;
pub use service::{AnswerRef, QaService};
pub use store::{QaStore, StoreError};
pub use validation::{AnswerInput, Credentials, NewQuestion};
