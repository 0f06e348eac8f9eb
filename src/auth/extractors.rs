use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::error::ApiError;

/// The raw token from `Authorization: <scheme> <token>`.
///
/// Only presence is checked. The value is never decoded or looked up.
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // raw bytes: header values may carry non-ASCII octets
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.as_bytes().split(|b| *b == b' ').nth(1))
            .filter(|t| !t.is_empty());

        match token {
            Some(t) => Ok(BearerToken(String::from_utf8_lossy(t).into_owned())),
            None => {
                warn!(uri = %parts.uri, "missing bearer token");
                Err(ApiError::unauthorized("Unauthorized"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request, StatusCode};

    async fn extract(auth: Option<&str>) -> Result<BearerToken, ApiError> {
        let mut req = Request::builder().uri("/projects");
        if let Some(v) = auth {
            req = req.header(AUTHORIZATION, v);
        }
        let (mut parts, _) = req.body(()).unwrap().into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn accepts_any_token_value() {
        let BearerToken(t) = extract(Some("Bearer definitely-not-issued-by-us")).await.unwrap();
        assert_eq!(t, "definitely-not-issued-by-us");
    }

    #[tokio::test]
    async fn accepts_non_ascii_token_bytes() {
        for raw in [&b"Bearer caf\xc3\xa9"[..], &b"Bearer \xe9t\xe9"[..]] {
            let mut parts = Request::builder()
                .uri("/projects")
                .body(())
                .unwrap()
                .into_parts()
                .0;
            parts
                .headers
                .insert(AUTHORIZATION, HeaderValue::from_bytes(raw).unwrap());
            let BearerToken(t) = BearerToken::from_request_parts(&mut parts, &())
                .await
                .unwrap();
            assert!(!t.is_empty());
        }
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let err = extract(None).await.err().expect("rejected");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_scheme_without_token() {
        assert!(extract(Some("Bearer")).await.is_err());
        assert!(extract(Some("Bearer ")).await.is_err());
    }
}
