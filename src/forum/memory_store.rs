//! In-process store for development mode and tests.
//!
//! Mirrors the relational rules of the PostgreSQL schema: unique admin
//! usernames, answers must reference a live question, and deleting a
//! question cascades to its answers.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::models::{AdminRecord, Answer, AnswerMutation, AnswerOwner, Question};
use super::search::SearchTerm;
use super::store::{QaStore, StoreError};
use super::validation::NewQuestion;

#[derive(Debug, Clone)]
struct AnswerRow {
    id: i64,
    question_id: i64,
    content: String,
    admin_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    admins: BTreeMap<i64, AdminRecord>,
    questions: BTreeMap<i64, Question>,
    answers: BTreeMap<i64, AnswerRow>,
    next_admin_id: i64,
    next_question_id: i64,
    next_answer_id: i64,
}

impl Tables {
    fn joined_answers(&self, question_id: i64) -> Vec<Answer> {
        let mut answers: Vec<Answer> = self
            .answers
            .values()
            .filter(|a| a.question_id == question_id)
            .filter_map(|a| {
                let admin = self.admins.get(&a.admin_id)?;
                Some(Answer {
                    id: a.id,
                    question_id: a.question_id,
                    content: a.content.clone(),
                    admin_id: a.admin_id,
                    admin_username: admin.username.clone(),
                    created_at: a.created_at,
                    updated_at: a.updated_at,
                })
            })
            .collect();
        answers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        answers
    }

    fn hydrated(&self, q: &Question) -> Question {
        Question {
            answers: self.joined_answers(q.id),
            ..q.clone()
        }
    }

    fn guarded(&self, answer_id: i64, admin_id: i64) -> Result<i64, AnswerMutation> {
        match self.answers.get(&answer_id) {
            None => Err(AnswerMutation::NotFound),
            Some(a) if a.admin_id != admin_id => Err(AnswerMutation::NotOwner),
            Some(a) => Ok(a.question_id),
        }
    }
}

/// Store held entirely in memory; lost on restart
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Timestamps must strictly advance so an edit is always observable.
fn after(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl QaStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminRecord>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.admins.values().find(|a| a.username == username).cloned())
    }

    async fn insert_admin(&self, username: &str, password_hash: &str) -> Result<i64, StoreError> {
        let mut t = self.tables.write().await;
        if t.admins.values().any(|a| a.username == username) {
            return Err(StoreError::Duplicate("Admin"));
        }
        t.next_admin_id += 1;
        let id = t.next_admin_id;
        t.admins.insert(
            id,
            AdminRecord {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn list_questions(
        &self,
        filter: Option<&SearchTerm>,
    ) -> Result<Vec<Question>, StoreError> {
        let t = self.tables.read().await;
        let mut questions: Vec<Question> = t
            .questions
            .values()
            .map(|q| t.hydrated(q))
            .filter(|q| filter.is_none_or(|term| term.matches(q)))
            .collect();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(questions)
    }

    async fn get_question(&self, id: i64) -> Result<Option<Question>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.questions.get(&id).map(|q| t.hydrated(q)))
    }

    async fn insert_question(&self, input: &NewQuestion) -> Result<i64, StoreError> {
        let mut t = self.tables.write().await;
        t.next_question_id += 1;
        let id = t.next_question_id;
        let now = Utc::now();
        t.questions.insert(
            id,
            Question {
                id,
                title: input.title.clone(),
                content: input.content.clone(),
                author_name: input.author_name.clone(),
                author_email: input.author_email.clone(),
                created_at: now,
                updated_at: now,
                answers: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        if t.questions.remove(&id).is_none() {
            return Ok(false);
        }
        t.answers.retain(|_, a| a.question_id != id);
        Ok(true)
    }

    async fn question_exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.questions.contains_key(&id))
    }

    async fn insert_answer(
        &self,
        question_id: i64,
        admin_id: i64,
        content: &str,
    ) -> Result<i64, StoreError> {
        let mut t = self.tables.write().await;
        if !t.questions.contains_key(&question_id) {
            return Err(StoreError::MissingReference("Question"));
        }
        if !t.admins.contains_key(&admin_id) {
            return Err(StoreError::MissingReference("Admin"));
        }
        t.next_answer_id += 1;
        let id = t.next_answer_id;
        let now = Utc::now();
        t.answers.insert(
            id,
            AnswerRow {
                id,
                question_id,
                content: content.to_string(),
                admin_id,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn find_answer_owner(&self, answer_id: i64) -> Result<Option<AnswerOwner>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.answers.get(&answer_id).map(|a| AnswerOwner {
            admin_id: a.admin_id,
            question_id: a.question_id,
        }))
    }

    async fn update_answer(
        &self,
        answer_id: i64,
        admin_id: i64,
        content: &str,
    ) -> Result<AnswerMutation, StoreError> {
        let mut t = self.tables.write().await;
        let question_id = match t.guarded(answer_id, admin_id) {
            Ok(qid) => qid,
            Err(miss) => return Ok(miss),
        };
        if let Some(a) = t.answers.get_mut(&answer_id) {
            a.content = content.to_string();
            a.updated_at = after(a.created_at.max(a.updated_at));
        }
        Ok(AnswerMutation::Applied { question_id })
    }

    async fn delete_answer(
        &self,
        answer_id: i64,
        admin_id: i64,
    ) -> Result<AnswerMutation, StoreError> {
        let mut t = self.tables.write().await;
        let question_id = match t.guarded(answer_id, admin_id) {
            Ok(qid) => qid,
            Err(miss) => return Ok(miss),
        };
        t.answers.remove(&answer_id);
        Ok(AnswerMutation::Applied { question_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str) -> NewQuestion {
        NewQuestion {
            title: title.to_string(),
            content: "I keep getting error Y when running Z".to_string(),
            author_name: "Alice".to_string(),
            author_email: None,
        }
    }

    #[tokio::test]
    async fn test_questions_newest_first_answers_oldest_first() {
        let store = MemoryStore::new();
        let admin = store.insert_admin("admin", "hash").await.unwrap();
        let q1 = store.insert_question(&sample("First question")).await.unwrap();
        let q2 = store.insert_question(&sample("Second question")).await.unwrap();
        let a1 = store.insert_answer(q1, admin, "answer one").await.unwrap();
        let a2 = store.insert_answer(q1, admin, "answer two").await.unwrap();

        let list = store.list_questions(None).await.unwrap();
        assert_eq!(list.iter().map(|q| q.id).collect::<Vec<_>>(), vec![q2, q1]);
        let answers: Vec<i64> = list[1].answers.iter().map(|a| a.id).collect();
        assert_eq!(answers, vec![a1, a2]);
        assert_eq!(list[1].answers[0].admin_username, "admin");
        assert!(list[0].answers.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_admin_rejected() {
        let store = MemoryStore::new();
        store.insert_admin("admin", "hash").await.unwrap();
        let err = store.insert_admin("admin", "other").await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("Admin")));
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_answers() {
        let store = MemoryStore::new();
        let admin = store.insert_admin("admin", "hash").await.unwrap();
        let qid = store.insert_question(&sample("Cascade question")).await.unwrap();
        let aid = store.insert_answer(qid, admin, "an answer").await.unwrap();

        assert!(store.delete_question(qid).await.unwrap());
        assert!(store.find_answer_owner(aid).await.unwrap().is_none());
        assert!(!store.delete_question(qid).await.unwrap());
    }

    #[tokio::test]
    async fn test_answer_requires_live_question() {
        let store = MemoryStore::new();
        let admin = store.insert_admin("admin", "hash").await.unwrap();
        let err = store.insert_answer(42, admin, "an answer").await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference("Question")));
    }

    #[tokio::test]
    async fn test_guarded_mutations() {
        let store = MemoryStore::new();
        let owner = store.insert_admin("owner", "hash").await.unwrap();
        let other = store.insert_admin("other", "hash").await.unwrap();
        let qid = store.insert_question(&sample("Guarded question")).await.unwrap();
        let aid = store.insert_answer(qid, owner, "original").await.unwrap();

        assert_eq!(
            store.update_answer(aid, other, "hijack").await.unwrap(),
            AnswerMutation::NotOwner
        );
        assert_eq!(
            store.delete_answer(aid, other).await.unwrap(),
            AnswerMutation::NotOwner
        );
        assert_eq!(
            store.update_answer(aid, owner, "edited").await.unwrap(),
            AnswerMutation::Applied { question_id: qid }
        );

        let q = store.get_question(qid).await.unwrap().unwrap();
        assert_eq!(q.answers[0].content, "edited");
        assert!(q.answers[0].is_edited());

        assert_eq!(
            store.delete_answer(aid, owner).await.unwrap(),
            AnswerMutation::Applied { question_id: qid }
        );
        assert_eq!(
            store.delete_answer(aid, owner).await.unwrap(),
            AnswerMutation::NotFound
        );
    }

    #[tokio::test]
    async fn test_filter_matches_answer_content() {
        let store = MemoryStore::new();
        let admin = store.insert_admin("admin", "hash").await.unwrap();
        let q1 = store.insert_question(&sample("How do I configure X?")).await.unwrap();
        store.insert_question(&sample("Another question")).await.unwrap();
        store
            .insert_answer(q1, admin, "Try upgrading to version 2")
            .await
            .unwrap();

        let term = SearchTerm::parse("UPGRADING").unwrap();
        let hits = store.list_questions(Some(&term)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, q1);
    }
}
