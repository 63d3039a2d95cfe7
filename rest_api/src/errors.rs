// rest_api/src/errors.rs

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use lib::CareError;
use models::ValidationError;
use security::{AccessError, AuthError};

pub const LOGIN_PAGE: &str = "/nursing-home/login";

#[derive(Debug, Error)]
pub enum RestApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// Malformed body of a JSON action.
    #[error("{0}")]
    BadRequest(String),
    /// No session on a page route: answered with a redirect to login.
    #[error("Please login to access this page.")]
    LoginRequired,
    /// No session on a JSON route.
    #[error("Please login to access this page.")]
    Unauthenticated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("You do not have permission to access this resource.")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("A record with these details already exists.")]
    Conflict,
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, RestApiError>;

impl From<CareError> for RestApiError {
    fn from(err: CareError) -> Self {
        match err {
            CareError::Validation(e) => RestApiError::Validation(e),
            CareError::Access(AccessError::Unauthenticated) => RestApiError::Unauthenticated,
            CareError::Access(AccessError::Forbidden) => RestApiError::Forbidden,
            CareError::Auth(AuthError::InvalidCredentials) => RestApiError::InvalidCredentials,
            CareError::Auth(AuthError::SessionExpired) | CareError::Auth(AuthError::Token(_)) => {
                RestApiError::Unauthenticated
            }
            CareError::NotFound(what) => RestApiError::NotFound(what),
            CareError::AlreadyExists(_) => RestApiError::Conflict,
            other => RestApiError::Internal(other.to_string()),
        }
    }
}

impl From<AccessError> for RestApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => RestApiError::Unauthenticated,
            AccessError::Forbidden => RestApiError::Forbidden,
        }
    }
}

impl RestApiError {
    /// Validation failures of JSON actions are plain bad requests.
    pub fn into_bad_request(self) -> Self {
        match self {
            RestApiError::Validation(e) => RestApiError::BadRequest(e.to_string()),
            other => other,
        }
    }
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RestApiError::LoginRequired => {
                return Redirect::to(LOGIN_PAGE).into_response();
            }
            RestApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            RestApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            RestApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, RestApiError::Unauthenticated.to_string())
            }
            RestApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, AuthError::InvalidCredentials.to_string())
            }
            RestApiError::Forbidden => (StatusCode::FORBIDDEN, AccessError::Forbidden.to_string()),
            RestApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            RestApiError::Conflict => (StatusCode::CONFLICT, RestApiError::Conflict.to_string()),
            RestApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request. Please try again.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, [(header::CACHE_CONTROL, "no-store")], body).into_response()
    }
}
