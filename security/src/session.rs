// security/src/session.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use models::Role;
use serde::{Deserialize, Serialize};

use crate::access::Identity;
use crate::AuthError;

/// Flat session claims. Every handler reads the caller through these same
/// keys via `Identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (username)
    pub sub: String,
    pub account_id: String,
    pub role: Role,
    pub entity_id: String,
    pub display_name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Identity {
            account_id: claims.account_id,
            username: claims.sub,
            role: claims.role,
            entity_id: claims.entity_id,
            display_name: claims.display_name,
        }
    }
}

/// Signs and checks HS256 session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        SessionKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: identity.username.clone(),
            account_id: identity.account_id.clone(),
            role: identity.role,
            entity_id: identity.entity_id.clone(),
            display_name: identity.display_name.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::Token(format!("Failed to encode session token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.into())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::Token(format!("Failed to decode or validate session token: {}", e)),
            })
    }
}
