//! Q&A operations: validation, existence checks and answer ownership.

use std::sync::Arc;

use super::models::{AnswerMutation, Question};
use super::search::SearchTerm;
use super::store::QaStore;
use super::validation::{ANSWER_FIELDS, AnswerInput, NewQuestion, QUESTION_FIELDS, validated};
use crate::auth::Principal;
use crate::error::{QaError, QaResult};

/// Which answer/question a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRef {
    pub answer_id: i64,
    pub question_id: i64,
}

#[derive(Clone)]
pub struct QaService {
    store: Arc<dyn QaStore>,
}

impl QaService {
    pub fn new(store: Arc<dyn QaStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn QaStore> {
        &self.store
    }

    pub async fn list_questions(&self, query: Option<&str>) -> QaResult<Vec<Question>> {
        let term = query.and_then(SearchTerm::parse);
        Ok(self.store.list_questions(term.as_ref()).await?)
    }

    pub async fn get_question(&self, id: i64) -> QaResult<Question> {
        self.store
            .get_question(id)
            .await?
            .ok_or(QaError::NotFound("Question"))
    }

    /// Returns the new question id.
    pub async fn create_question(&self, input: NewQuestion) -> QaResult<i64> {
        let input = validated(input, QUESTION_FIELDS)?;
        let id = self.store.insert_question(&input).await?;
        tracing::info!(question_id = id, author = %input.author_name, "Question created");
        Ok(id)
    }

    pub async fn delete_question(&self, id: i64, principal: &Principal) -> QaResult<()> {
        if !self.store.delete_question(id).await? {
            return Err(QaError::NotFound("Question"));
        }
        tracing::info!(question_id = id, admin_id = principal.id, "Question deleted");
        Ok(())
    }

    /// Returns the new answer id.
    pub async fn create_answer(
        &self,
        question_id: i64,
        input: AnswerInput,
        principal: &Principal,
    ) -> QaResult<i64> {
        let input = validated(input, ANSWER_FIELDS)?;
        if !self.store.question_exists(question_id).await? {
            return Err(QaError::NotFound("Question"));
        }
        let id = self
            .store
            .insert_answer(question_id, principal.id, &input.content)
            .await?;
        tracing::info!(answer_id = id, question_id, admin_id = principal.id, "Answer created");
        Ok(id)
    }

    pub async fn update_answer(
        &self,
        answer_id: i64,
        input: AnswerInput,
        principal: &Principal,
    ) -> QaResult<AnswerRef> {
        // Ownership is decided before the payload is looked at.
        self.authorize_answer(answer_id, principal).await?;
        let input = validated(input, ANSWER_FIELDS)?;
        let outcome = self
            .store
            .update_answer(answer_id, principal.id, &input.content)
            .await?;
        let applied = applied(answer_id, outcome)?;
        tracing::info!(answer_id, admin_id = principal.id, "Answer updated");
        Ok(applied)
    }

    pub async fn delete_answer(&self, answer_id: i64, principal: &Principal) -> QaResult<AnswerRef> {
        let outcome = self.store.delete_answer(answer_id, principal.id).await?;
        let applied = applied(answer_id, outcome)?;
        tracing::info!(answer_id, admin_id = principal.id, "Answer deleted");
        Ok(applied)
    }

    async fn authorize_answer(&self, answer_id: i64, principal: &Principal) -> QaResult<()> {
        match self.store.find_answer_owner(answer_id).await? {
            None => Err(QaError::NotFound("Answer")),
            Some(owner) if owner.admin_id != principal.id => {
                tracing::warn!(
                    answer_id,
                    owner_id = owner.admin_id,
                    admin_id = principal.id,
                    "Rejected mutation of another admin's answer"
                );
                Err(QaError::Forbidden(NOT_OWNER))
            }
            Some(_) => Ok(()),
        }
    }
}

const NOT_OWNER: &str = "Only the author of an answer may modify it";

fn applied(answer_id: i64, outcome: AnswerMutation) -> QaResult<AnswerRef> {
    match outcome {
        AnswerMutation::Applied { question_id } => Ok(AnswerRef {
            answer_id,
            question_id,
        }),
        AnswerMutation::NotFound => Err(QaError::NotFound("Answer")),
        AnswerMutation::NotOwner => Err(QaError::Forbidden(NOT_OWNER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::forum::memory_store::MemoryStore;

    struct Fixture {
        service: QaService,
        alice_admin: Principal,
        bob_admin: Principal,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let a = store.insert_admin("admin", "hash").await.unwrap();
        let b = store.insert_admin("second", "hash").await.unwrap();
        Fixture {
            service: QaService::new(store),
            alice_admin: Principal {
                id: a,
                username: "admin".into(),
            },
            bob_admin: Principal {
                id: b,
                username: "second".into(),
            },
        }
    }

    fn alice() -> NewQuestion {
        NewQuestion {
            title: "How do I configure X?".to_string(),
            content: "I keep getting error Y when running Z".to_string(),
            author_name: "Alice".to_string(),
            author_email: None,
        }
    }

    fn answer(content: &str) -> AnswerInput {
        AnswerInput {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_created_question_is_listed_with_no_answers() {
        let f = fixture().await;
        let id = f.service.create_question(alice()).await.unwrap();
        let list = f.service.list_questions(None).await.unwrap();
        let q = list.iter().find(|q| q.id == id).unwrap();
        assert!(q.answers.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_question_persists_nothing() {
        let f = fixture().await;
        let err = f
            .service
            .create_question(NewQuestion {
                author_name: "A".into(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field_errors()[0].field, "author_name");
        assert!(f.service.list_questions(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_answer_on_missing_question_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .create_answer(999, answer("Try upgrading"), &f.alice_admin)
            .await
            .unwrap_err();
        assert!(matches!(err, QaError::NotFound("Question")));
    }

    #[tokio::test]
    async fn test_short_answer_is_validation_error() {
        let f = fixture().await;
        let qid = f.service.create_question(alice()).await.unwrap();
        let err = f
            .service
            .create_answer(qid, answer("abc"), &f.alice_admin)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_non_author_is_forbidden_regardless_of_payload() {
        let f = fixture().await;
        let qid = f.service.create_question(alice()).await.unwrap();
        let aid = f
            .service
            .create_answer(qid, answer("Try upgrading to version 2"), &f.alice_admin)
            .await
            .unwrap();

        for payload in [answer("x"), answer("A perfectly valid edit")] {
            let err = f
                .service
                .update_answer(aid, payload, &f.bob_admin)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Forbidden);
        }
        let err = f.service.delete_answer(aid, &f.bob_admin).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let q = f.service.get_question(qid).await.unwrap();
        assert_eq!(q.answers[0].content, "Try upgrading to version 2");
    }

    #[tokio::test]
    async fn test_author_can_edit_and_delete() {
        let f = fixture().await;
        let qid = f.service.create_question(alice()).await.unwrap();
        let aid = f
            .service
            .create_answer(qid, answer("Try upgrading to version 2"), &f.alice_admin)
            .await
            .unwrap();

        let r = f
            .service
            .update_answer(aid, answer("  Try upgrading to version 3  "), &f.alice_admin)
            .await
            .unwrap();
        assert_eq!(r, AnswerRef { answer_id: aid, question_id: qid });

        let q = f.service.get_question(qid).await.unwrap();
        assert_eq!(q.answers[0].content, "Try upgrading to version 3");
        assert!(q.answers[0].is_edited());

        f.service.delete_answer(aid, &f.alice_admin).await.unwrap();
        let err = f.service.delete_answer(aid, &f.alice_admin).await.unwrap_err();
        assert!(matches!(err, QaError::NotFound("Answer")));
    }

    #[tokio::test]
    async fn test_any_admin_deletes_question_and_answers_go_with_it() {
        let f = fixture().await;
        let qid = f.service.create_question(alice()).await.unwrap();
        let aid = f
            .service
            .create_answer(qid, answer("Try upgrading to version 2"), &f.alice_admin)
            .await
            .unwrap();

        f.service.delete_question(qid, &f.bob_admin).await.unwrap();
        assert!(f.service.store().find_answer_owner(aid).await.unwrap().is_none());

        let err = f.service.delete_question(qid, &f.bob_admin).await.unwrap_err();
        assert!(matches!(err, QaError::NotFound("Question")));
        let err = f.service.get_question(qid).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_server_side_query_filter() {
        let f = fixture().await;
        let qid = f.service.create_question(alice()).await.unwrap();
        f.service
            .create_question(NewQuestion {
                title: "Something unrelated".into(),
                content: "Nothing to see in this body".into(),
                author_name: "Bob".into(),
                author_email: None,
            })
            .await
            .unwrap();
        f.service
            .create_answer(qid, answer("Try upgrading to version 2"), &f.alice_admin)
            .await
            .unwrap();

        let hits = f.service.list_questions(Some("upgrading")).await.unwrap();
        assert_eq!(hits.iter().map(|q| q.id).collect::<Vec<_>>(), vec![qid]);
        assert_eq!(f.service.list_questions(Some("  ")).await.unwrap().len(), 2);
    }
}
