//! Request payloads and their validation rules.
//!
//! String fields are trimmed by [`Normalize`] before validation and storage.
//! Missing JSON fields deserialize as empty strings so that the length rule,
//! not the JSON parser, names the offending field.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{FieldError, QaError};

/// Trim-in-place normalization applied before validation.
pub trait Normalize {
    fn normalize(self) -> Self;
}

/// Question submission (public)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewQuestion {
    #[serde(default)]
    #[validate(length(min = 5, max = 255, message = "title must be between 5 and 255 characters"))]
    #[schema(example = "How do I configure X?")]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 10, message = "content must be at least 10 characters"))]
    #[schema(example = "I keep getting error Y when running Z")]
    pub content: String,

    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "author_name must be between 2 and 100 characters"))]
    #[schema(example = "Alice")]
    pub author_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        email(message = "author_email is not a valid email address"),
        length(max = 100, message = "author_email must be at most 100 characters")
    )]
    #[schema(example = "alice@example.com")]
    pub author_email: Option<String>,
}

impl Normalize for NewQuestion {
    fn normalize(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            author_name: self.author_name.trim().to_string(),
            author_email: self
                .author_email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        }
    }
}

/// Answer body, used for both create and edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnswerInput {
    #[serde(default)]
    #[validate(length(min = 5, message = "content must be at least 5 characters"))]
    #[schema(example = "Try upgrading to version 2")]
    pub content: String,
}

impl Normalize for AnswerInput {
    fn normalize(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}

/// Admin credentials as sent to login and bootstrap.
///
/// Login only requires a username; an over-long one is simply unknown.
#[derive(Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "admin")]
    pub username: String,

    /// Never trimmed.
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    #[schema(example = "admin123")]
    pub password: String,
}

impl Normalize for Credentials {
    fn normalize(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

/// Bootstrap rules: the username must fit the `admins.username` column.
#[derive(Clone, Validate)]
pub struct NewAdmin {
    #[validate(length(min = 1, max = 50, message = "username must be between 1 and 50 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl From<Credentials> for NewAdmin {
    fn from(c: Credentials) -> Self {
        Self {
            username: c.username,
            password: c.password,
        }
    }
}

impl Normalize for NewAdmin {
    fn normalize(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

impl std::fmt::Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:<redacted>", self.username)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for NewAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Normalize then validate, collecting every violated field.
///
/// `order` lists field names in declaration order so the reported
/// details are deterministic.
pub fn validated<T>(input: T, order: &[&str]) -> Result<T, QaError>
where
    T: Normalize + Validate,
{
    let input = input.normalize();
    match input.validate() {
        Ok(()) => Ok(input),
        Err(errors) => {
            let mut fields: Vec<FieldError> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    let field = field.to_string();
                    errs.iter().map(move |e| {
                        let message = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field));
                        FieldError::new(field.clone(), message)
                    })
                })
                .collect();
            fields.sort_by_key(|f| {
                order
                    .iter()
                    .position(|name| *name == f.field)
                    .unwrap_or(order.len())
            });
            Err(QaError::Validation(fields))
        }
    }
}

pub const QUESTION_FIELDS: &[&str] = &["title", "content", "author_name", "author_email"];
pub const ANSWER_FIELDS: &[&str] = &["content"];
pub const CREDENTIAL_FIELDS: &[&str] = &["username", "password"];
