//! Typed HTTP client for the Q&A API.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::error::ErrorResponse;
use crate::api::handlers::HealthResponse;
use crate::api::types::{AnswerChanged, AnswerCreated, QuestionCreated, QuestionDeleted};
use crate::auth::LoginResponse;
use crate::auth::handlers::CreateAdminResponse;
use crate::error::{ErrorKind, FieldError};
use crate::forum::models::Question;
use crate::forum::validation::{AnswerInput, Credentials, NewQuestion};

#[derive(Error, Debug)]
pub enum ClientError {
    /// The API answered with an error status
    #[error("{}", .body.message)]
    Api { status: u16, body: ErrorResponse },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("Login required")]
    NotLoggedIn,
}

impl ClientError {
    /// The stored session is no longer usable: a 401, or a 403 that names
    /// the token rather than ownership.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Api { status: 401, .. } => true,
            Self::Api { status: 403, body } => body.code == ErrorKind::InvalidToken.code(),
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Api { body, .. } => &body.details,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        Self::send(self.http.get(self.url("/health"))).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let req = self.http.post(self.url("/auth/login")).json(credentials);
        Self::send(req).await
    }

    pub async fn create_admin(
        &self,
        credentials: &Credentials,
    ) -> Result<CreateAdminResponse, ClientError> {
        let req = self.http.post(self.url("/auth/create-admin")).json(credentials);
        Self::send(req).await
    }

    /// `query` is passed as `?q=` for server-side filtering.
    pub async fn list_questions(&self, query: Option<&str>) -> Result<Vec<Question>, ClientError> {
        let mut req = self.http.get(self.url("/questions"));
        if let Some(q) = query {
            req = req.query(&[("q", q)]);
        }
        Self::send(req).await
    }

    pub async fn get_question(&self, id: i64) -> Result<Question, ClientError> {
        Self::send(self.http.get(self.url(&format!("/questions/{}", id)))).await
    }

    pub async fn create_question(&self, input: &NewQuestion) -> Result<QuestionCreated, ClientError> {
        let req = self.http.post(self.url("/questions")).json(input);
        Self::send(req).await
    }

    pub async fn delete_question(&self, token: &str, id: i64) -> Result<QuestionDeleted, ClientError> {
        let req = self
            .http
            .delete(self.url(&format!("/questions/{}", id)))
            .bearer_auth(token);
        Self::send(req).await
    }

    pub async fn create_answer(
        &self,
        token: &str,
        question_id: i64,
        input: &AnswerInput,
    ) -> Result<AnswerCreated, ClientError> {
        let req = self
            .http
            .post(self.url(&format!("/questions/{}/answers", question_id)))
            .bearer_auth(token)
            .json(input);
        Self::send(req).await
    }

    pub async fn update_answer(
        &self,
        token: &str,
        answer_id: i64,
        input: &AnswerInput,
    ) -> Result<AnswerChanged, ClientError> {
        let req = self
            .http
            .put(self.url(&format!("/answers/{}", answer_id)))
            .bearer_auth(token)
            .json(input);
        Self::send(req).await
    }

    pub async fn delete_answer(&self, token: &str, answer_id: i64) -> Result<AnswerChanged, ClientError> {
        let req = self
            .http
            .delete(self.url(&format!("/answers/{}", answer_id)))
            .bearer_auth(token);
        Self::send(req).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let body = serde_json::from_str::<ErrorResponse>(&text).unwrap_or_else(|_| ErrorResponse {
        code: 0,
        error: status
            .canonical_reason()
            .unwrap_or("HTTP_ERROR")
            .to_string(),
        message: fallback_message(status, &text),
        details: Vec::new(),
    });
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

fn fallback_message(status: StatusCode, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, kind: ErrorKind, message: &str) -> ClientError {
        ClientError::Api {
            status,
            body: ErrorResponse {
                code: kind.code(),
                error: kind.name().into(),
                message: message.into(),
                details: Vec::new(),
            },
        }
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(api_error(401, ErrorKind::Unauthenticated, "Access token required").is_auth_failure());
        assert!(api_error(403, ErrorKind::InvalidToken, "Invalid or expired token").is_auth_failure());
        assert!(!api_error(403, ErrorKind::Forbidden, "not yours").is_auth_failure());
        assert!(!api_error(404, ErrorKind::NotFound, "Answer not found").is_auth_failure());
        assert!(!ClientError::NotLoggedIn.is_auth_failure());
    }

    #[test]
    fn test_display_uses_server_message() {
        let err = api_error(401, ErrorKind::Unauthenticated, "Access token required");
        assert_eq!(err.to_string(), "Access token required");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(api.url("/questions"), "http://localhost:5000/api/questions");
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(fallback_message(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
        assert_eq!(fallback_message(StatusCode::BAD_REQUEST, "bad"), "bad");
    }
}
