use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Extractor that enforces authorization on any handler that includes it as
/// a parameter. It reads the caller's bearer credential, asks the access
/// gateway for a decision scoped to this exact method + path, and on Allow
/// yields the principal identity. On anything else the handler never runs:
/// a missing credential short-circuits with 401, a Deny with 403, and a
/// registry failure with the gateway's own error response — never an
/// ambiguous allow.
pub struct CallerIdentity(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        let token = match bearer_token(&parts.headers) {
            Some(token) => token,
            None => return Err(StatusCode::UNAUTHORIZED.into_response()),
        };

        let resource = format!("{} {}", parts.method, parts.uri.path());

        match state.gateway.authorize(&token, &resource).await {
            Ok(decision) if decision.is_allow() => Ok(CallerIdentity(decision.principal_id)),
            Ok(_) => Err(StatusCode::FORBIDDEN.into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// Pull the credential out of the Authorization header. A "Bearer " prefix
/// is stripped when present; otherwise the raw header value is the token.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then(|| token.to_owned())
}
