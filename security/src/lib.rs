// security/src/lib.rs

pub mod access;
pub mod password;
pub mod session;

use thiserror::Error;

pub use access::{
    authorize_patient, can_view_ambulance_request, can_view_patient, patient_scope, require_role,
    AccessError, Identity, PatientScope,
};
pub use password::{hash_password, verify_password};
pub use session::{SessionClaims, SessionKeys};

/// Failures while proving who a caller is.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid clinic ID or password")]
    InvalidCredentials,
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
    #[error("Session token error: {0}")]
    Token(String),
    #[error("Session expired")]
    SessionExpired,
}
