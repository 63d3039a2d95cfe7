// rest_api/src/session.rs
//
// Session extraction. The session token travels in a cookie for browser
// pages, or in an `Authorization: Bearer` header for API clients.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use tracing::debug;

use security::{AuthError, Identity};

use crate::errors::RestApiError;
use crate::AppState;

/// The signed-in caller of a page route. Missing or invalid sessions are
/// redirected to the login page.
#[derive(Debug, Clone)]
pub struct Session(pub Identity);

/// The signed-in caller of a JSON route. Missing or invalid sessions get
/// a `401` JSON body.
#[derive(Debug, Clone)]
pub struct ApiSession(pub Identity);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn cookie_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
}

fn identity_from_parts(parts: &Parts, state: &AppState) -> Option<Identity> {
    let token = bearer_token(&parts.headers).or_else(|| cookie_token(&parts.headers, &state.cookie_name))?;
    match state.keys.verify(token) {
        Ok(identity) => Some(identity),
        Err(AuthError::SessionExpired) => {
            debug!("Session expired for request to {}", parts.uri.path());
            None
        }
        Err(e) => {
            debug!("Rejected session token: {}", e);
            None
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = RestApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts, state)
            .map(Session)
            .ok_or(RestApiError::LoginRequired)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ApiSession {
    type Rejection = RestApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts, state)
            .map(ApiSession)
            .ok_or(RestApiError::Unauthenticated)
    }
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(state: &AppState, token: &str) -> Result<HeaderValue, RestApiError> {
    let max_age = state.keys.ttl().num_seconds();
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        state.cookie_name, token, max_age
    ))
    .map_err(|e| RestApiError::Internal(format!("invalid session cookie: {}", e)))
}

/// `Set-Cookie` value that clears the session.
pub fn clear_cookie(state: &AppState) -> Result<HeaderValue, RestApiError> {
    HeaderValue::from_str(&format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        state.cookie_name
    ))
    .map_err(|e| RestApiError::Internal(format!("invalid session cookie: {}", e)))
}
