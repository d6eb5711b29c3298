//! Caller identity, as vouched for by the upstream auth layer.
//!
//! Authentication happens before requests reach this service. The
//! authenticated user id arrives in the [`CALLER_HEADER`] header and is
//! trusted as-is.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::request::Parts;
use http::StatusCode;

use common::prelude::UserId;

pub const CALLER_HEADER: &str = "x-sealpost-user";

/// Authenticated caller. Rejects the request when absent
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub UserId);

/// Caller identity for routes that also serve anonymous callers
#[derive(Debug, Clone, Copy)]
pub struct MaybeCallerId(pub Option<UserId>);

#[derive(Debug, thiserror::Error)]
pub enum CallerRejection {
    #[error("missing caller identity")]
    Missing,
    #[error("malformed caller identity")]
    Malformed,
}

impl IntoResponse for CallerRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.to_string()});
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn caller_from_parts(parts: &Parts) -> Result<Option<UserId>, CallerRejection> {
    let value = match parts.headers.get(CALLER_HEADER) {
        Some(value) => value,
        None => return Ok(None),
    };

    let user_id: UserId = value
        .to_str()
        .map_err(|_| CallerRejection::Malformed)?
        .parse()
        .map_err(|_| CallerRejection::Malformed)?;

    if user_id.is_nil() {
        return Err(CallerRejection::Malformed);
    }

    Ok(Some(user_id))
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = CallerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        caller_from_parts(parts)?
            .map(CallerId)
            .ok_or(CallerRejection::Missing)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeCallerId
where
    S: Send + Sync,
{
    type Rejection = CallerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        caller_from_parts(parts).map(MaybeCallerId)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parts_with(value: Option<&str>) -> Parts {
        let mut builder = http::Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(CALLER_HEADER, value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_caller_required() {
        let user = UserId::generate();

        let mut parts = parts_with(Some(&user.to_string()));
        let CallerId(caller) = CallerId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(caller, user);

        let mut parts = parts_with(None);
        assert!(matches!(
            CallerId::from_request_parts(&mut parts, &()).await,
            Err(CallerRejection::Missing)
        ));
    }

    #[tokio::test]
    async fn test_malformed_callers_rejected() {
        for value in ["not-a-uuid", "00000000-0000-0000-0000-000000000000"] {
            let mut parts = parts_with(Some(value));
            assert!(matches!(
                MaybeCallerId::from_request_parts(&mut parts, &()).await,
                Err(CallerRejection::Malformed)
            ));
        }
    }

    #[tokio::test]
    async fn test_anonymous_caller_allowed() {
        let mut parts = parts_with(None);
        let MaybeCallerId(caller) = MaybeCallerId::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(caller.is_none());
    }
}
