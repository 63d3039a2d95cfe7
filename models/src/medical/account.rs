// models/src/medical/account.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// A login credential row. The secret is stored only as a PHC hash string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    /// Clinic id for nursing homes, the username for administrators.
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: String, password_hash: String, role: Role, entity_id: String) -> Self {
        Account {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            role,
            entity_id,
            created_at: Utc::now(),
        }
    }
}
