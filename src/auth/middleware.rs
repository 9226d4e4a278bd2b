use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::error::QaError;

/// Bearer token from the Authorization header.
///
/// Missing header, another scheme, or an empty token all mean the caller
/// presented no credential.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, QaError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(QaError::Unauthenticated)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(QaError::Unauthenticated)?;

    if token.is_empty() {
        return Err(QaError::Unauthenticated);
    }
    Ok(token)
}

pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, QaError> {
    let principal = state.auth.verify_token(bearer_token(request.headers())?)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(QaError::Unauthenticated)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        assert!(matches!(
            bearer_token(&headers("Basic YWRtaW46YWRtaW4xMjM=")),
            Err(QaError::Unauthenticated)
        ));
    }

    #[test]
    fn test_empty_token() {
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(QaError::Unauthenticated)
        ));
    }

    #[test]
    fn test_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }
}
