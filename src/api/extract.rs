use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::QaError;

/// `Json<T>` whose rejection is reported as a validation error
/// instead of axum's plain-text body.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QaError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected_body(rejection)),
        }
    }
}

/// `Path<T>` counterpart: a malformed id becomes a validation error on `id`.
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = QaError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected_path(rejection)),
        }
    }
}

fn rejected_body(rejection: JsonRejection) -> QaError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    QaError::invalid("body", rejection.body_text())
}

fn rejected_path(rejection: PathRejection) -> QaError {
    tracing::debug!("Rejected path parameter: {}", rejection.body_text());
    QaError::invalid("id", "id must be an integer")
}
