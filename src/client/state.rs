//! Client-side view of the forum.
//!
//! [`ClientState`] owns the logged-in session, a snapshot of every question
//! and an optional search view over that snapshot. The snapshot changes only
//! through [`ClientState::refresh`], which every successful mutation calls.

use super::http::{ApiClient, ClientError};
use super::session::{Session, SessionStore};
use crate::forum::models::{AdminInfo, Question};
use crate::forum::search::SearchTerm;
use crate::forum::validation::{AnswerInput, Credentials, NewQuestion};

struct SearchView {
    term: SearchTerm,
    results: Vec<Question>,
}

pub struct ClientState<S: SessionStore> {
    api: ApiClient,
    sessions: S,
    session: Option<Session>,
    questions: Vec<Question>,
    search: Option<SearchView>,
    login_required: bool,
}

impl<S: SessionStore> ClientState<S> {
    /// Restores a persisted session if one exists.
    pub fn new(api: ApiClient, sessions: S) -> Result<Self, ClientError> {
        let session = sessions.load()?;
        Ok(Self {
            api,
            sessions,
            session,
            questions: Vec::new(),
            search: None,
            login_required: false,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn admin(&self) -> Option<&AdminInfo> {
        self.session.as_ref().map(|s| &s.admin)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Persist first; memory changes only once the record is on disk.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<AdminInfo, ClientError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp = self.api.login(&credentials).await?;
        let session = Session {
            token: resp.token,
            admin: resp.admin,
        };
        self.sessions.save(&session)?;
        let admin = session.admin.clone();
        self.session = Some(session);
        self.login_required = false;
        Ok(admin)
    }

    /// Disk first; a failed removal leaves the session in place.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.sessions.clear()?;
        self.session = None;
        Ok(())
    }

    /// Consumes the "go to login" signal raised by a forced logout.
    pub fn take_login_required(&mut self) -> bool {
        std::mem::take(&mut self.login_required)
    }

    /// Every question with answers, newest first.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// `None` when no search is active (distinct from zero results).
    pub fn search_results(&self) -> Option<&[Question]> {
        self.search.as_ref().map(|s| s.results.as_slice())
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.term.as_str())
    }

    /// What the presentation layer should render.
    pub fn visible_questions(&self) -> &[Question] {
        self.search_results().unwrap_or(&self.questions)
    }

    pub async fn refresh(&mut self) -> Result<&[Question], ClientError> {
        let questions = self.api.list_questions(None).await;
        self.questions = self.guard(questions)?;
        if let Some(view) = self.search.as_mut() {
            view.results = view.term.filter(&self.questions);
        }
        Ok(&self.questions)
    }

    /// Local search over the cached snapshot; a blank term clears the view.
    pub fn search(&mut self, term: &str) -> Option<&[Question]> {
        self.search = SearchTerm::parse(term).map(|term| {
            let results = term.filter(&self.questions);
            SearchView { term, results }
        });
        self.search_results()
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }

    /// Server-side `?q=` search; leaves the cache untouched.
    pub async fn remote_search(&mut self, term: &str) -> Result<Vec<Question>, ClientError> {
        let result = self.api.list_questions(Some(term)).await;
        self.guard(result)
    }

    pub async fn fetch_question(&mut self, id: i64) -> Result<Question, ClientError> {
        let result = self.api.get_question(id).await;
        self.guard(result)
    }

    pub async fn ask(&mut self, input: NewQuestion) -> Result<i64, ClientError> {
        let result = self.api.create_question(&input).await;
        let created = self.guard(result)?;
        self.refresh().await?;
        Ok(created.question_id)
    }

    pub async fn answer(&mut self, question_id: i64, content: &str) -> Result<i64, ClientError> {
        let token = self.token()?;
        let input = AnswerInput {
            content: content.to_string(),
        };
        let result = self.api.create_answer(&token, question_id, &input).await;
        let created = self.guard(result)?;
        self.refresh().await?;
        Ok(created.answer_id)
    }

    pub async fn edit_answer(&mut self, answer_id: i64, content: &str) -> Result<(), ClientError> {
        let token = self.token()?;
        let input = AnswerInput {
            content: content.to_string(),
        };
        let result = self.api.update_answer(&token, answer_id, &input).await;
        self.guard(result)?;
        self.refresh().await?;
        Ok(())
    }

    pub async fn delete_answer(&mut self, answer_id: i64) -> Result<(), ClientError> {
        let token = self.token()?;
        let result = self.api.delete_answer(&token, answer_id).await;
        self.guard(result)?;
        self.refresh().await?;
        Ok(())
    }

    pub async fn delete_question(&mut self, question_id: i64) -> Result<(), ClientError> {
        let token = self.token()?;
        let result = self.api.delete_question(&token, question_id).await;
        self.guard(result)?;
        self.refresh().await?;
        Ok(())
    }

    fn token(&self) -> Result<String, ClientError> {
        self.session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ClientError::NotLoggedIn)
    }

    /// A rejected credential ends the session and asks for a new login.
    fn guard<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if result.as_ref().is_err_and(ClientError::is_auth_failure) {
            self.force_logout();
        }
        result
    }

    fn force_logout(&mut self) {
        tracing::warn!("API rejected credentials; logging out");
        self.session = None;
        if let Err(e) = self.sessions.clear() {
            tracing::error!("Failed to clear stored session: {}", e);
        }
        self.login_required = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::session::MemorySessionStore;
    use crate::forum::models::Answer;
    use chrono::Utc;

    fn question(id: i64, title: &str, answers: &[&str]) -> Question {
        let now = Utc::now();
        Question {
            id,
            title: title.to_string(),
            content: "Some longer body text".to_string(),
            author_name: "Alice".to_string(),
            author_email: None,
            created_at: now,
            updated_at: now,
            answers: answers
                .iter()
                .enumerate()
                .map(|(i, c)| Answer {
                    id: i as i64 + 1,
                    question_id: id,
                    content: c.to_string(),
                    admin_id: 1,
                    admin_username: "admin".to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        }
    }

    fn state_with(questions: Vec<Question>) -> ClientState<MemorySessionStore> {
        // Never contacted by these tests.
        let api = ApiClient::new("http://127.0.0.1:9/api");
        let mut state = ClientState::new(api, MemorySessionStore::new()).unwrap();
        state.questions = questions;
        state
    }

    #[test]
    fn test_blank_search_clears_view() {
        let mut state = state_with(vec![question(1, "How do I configure X?", &[])]);
        assert_eq!(state.search("configure").map(|r| r.len()), Some(1));
        assert!(state.search("   ").is_none());
        assert!(state.search_results().is_none());
        assert_eq!(state.visible_questions().len(), 1);
    }

    #[test]
    fn test_no_match_is_empty_not_cleared() {
        let mut state = state_with(vec![question(1, "How do I configure X?", &[])]);
        assert_eq!(state.search("kubernetes").map(|r| r.len()), Some(0));
        assert!(state.visible_questions().is_empty());
        state.clear_search();
        assert_eq!(state.visible_questions().len(), 1);
    }

    #[test]
    fn test_search_through_answers() {
        let mut state = state_with(vec![
            question(1, "How do I configure X?", &["Try upgrading to version 2"]),
            question(2, "Unrelated", &[]),
        ]);
        let hits = state.search("UPGRADING").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(state.search_term(), Some("upgrading"));
    }

    #[tokio::test]
    async fn test_mutation_requires_login() {
        let mut state = state_with(Vec::new());
        let err = state.answer(1, "Try upgrading").await.unwrap_err();
        assert!(matches!(err, ClientError::NotLoggedIn));
    }

    struct BrokenClear(MemorySessionStore);

    impl SessionStore for BrokenClear {
        fn load(&self) -> Result<Option<Session>, ClientError> {
            self.0.load()
        }
        fn save(&self, session: &Session) -> Result<(), ClientError> {
            self.0.save(session)
        }
        fn clear(&self) -> Result<(), ClientError> {
            Err(ClientError::Session("read-only".to_string()))
        }
    }

    #[test]
    fn test_failed_logout_keeps_session() {
        let sessions = MemorySessionStore::new();
        sessions
            .save(&Session {
                token: "t".into(),
                admin: AdminInfo {
                    id: 1,
                    username: "admin".into(),
                },
            })
            .unwrap();
        let api = ApiClient::new("http://127.0.0.1:9/api");
        let mut state = ClientState::new(api, BrokenClear(sessions)).unwrap();

        assert!(state.logout().is_err());
        assert!(state.is_authenticated());
        assert!(state.sessions.load().unwrap().is_some());
    }

    #[test]
    fn test_forced_logout_raises_signal_once() {
        let sessions = MemorySessionStore::new();
        sessions
            .save(&Session {
                token: "t".into(),
                admin: AdminInfo {
                    id: 1,
                    username: "admin".into(),
                },
            })
            .unwrap();
        let mut state = ClientState::new(ApiClient::new("http://127.0.0.1:9/api"), sessions).unwrap();
        assert!(state.is_authenticated());

        state.force_logout();
        assert!(!state.is_authenticated());
        assert_eq!(state.sessions.load().unwrap(), None);
        assert!(state.take_login_required());
        assert!(!state.take_login_required());
    }
}
