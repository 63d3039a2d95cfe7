// models/src/medical/ambulance.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationResult;
use crate::form::required;
use crate::identifiers::new_request_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbulanceStatus {
    Pending,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbulanceRequest {
    pub request_id: String,
    pub patient_id: String,
    /// Clinic that owns the patient; scopes who may list the request.
    pub requested_by: String,
    pub pickup_location: String,
    pub drop_location: String,
    pub status: AmbulanceStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl AmbulanceRequest {
    /// Moves a pending request to `Resolved`. Returns `false` when it was
    /// already resolved.
    pub fn resolve(&mut self) -> bool {
        if self.status == AmbulanceStatus::Resolved {
            return false;
        }
        self.status = AmbulanceStatus::Resolved;
        self.resolved_at = Some(Utc::now());
        true
    }
}

/// JSON body of the request-ambulance call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmbulanceRequestDraft {
    pub pickup_location: Option<String>,
    pub drop_location: Option<String>,
}

impl AmbulanceRequestDraft {
    pub fn into_request(self, patient_id: &str, requested_by: &str) -> ValidationResult<AmbulanceRequest> {
        let pickup_location = required(self.pickup_location, "Pickup location")?;
        let drop_location = required(self.drop_location, "Drop location")?;
        Ok(AmbulanceRequest {
            request_id: new_request_id(),
            patient_id: patient_id.to_string(),
            requested_by: requested_by.to_string(),
            pickup_location,
            drop_location,
            status: AmbulanceStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        })
    }
}
