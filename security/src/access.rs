// security/src/access.rs
//
// Every patient-scoped decision in the service goes through this module.

use models::{Account, AmbulanceRequest, Patient, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Please login to access this page.")]
    Unauthenticated,
    /// Carries no detail about the protected resource.
    #[error("You do not have permission to access this resource.")]
    Forbidden,
}

/// The authenticated caller, as resolved from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub account_id: String,
    pub username: String,
    pub role: Role,
    /// Owning entity: the clinic id for nursing homes.
    pub entity_id: String,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn from_account(account: &Account, display_name: Option<String>) -> Self {
        Identity {
            account_id: account.id.clone(),
            username: account.username.clone(),
            role: account.role,
            entity_id: account.entity_id.clone(),
            display_name,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The clinic a nursing-home identity acts for; `None` for admins.
    pub fn clinic_id(&self) -> Option<&str> {
        match self.role {
            Role::NursingHome => Some(&self.entity_id),
            Role::Admin => None,
        }
    }
}

/// Which patient collections a caller may scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientScope {
    All,
    Clinic(String),
}

impl PatientScope {
    pub fn admits(&self, clinic_id: &str) -> bool {
        match self {
            PatientScope::All => true,
            PatientScope::Clinic(own) => own == clinic_id,
        }
    }
}

pub fn patient_scope(identity: &Identity) -> PatientScope {
    match identity.role {
        Role::Admin => PatientScope::All,
        Role::NursingHome => PatientScope::Clinic(identity.entity_id.clone()),
    }
}

/// An admin sees every patient; a nursing home only those it referred.
pub fn can_view_patient(identity: &Identity, patient: &Patient) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::NursingHome => patient.is_referred_by(&identity.entity_id),
    }
}

pub fn authorize_patient(identity: &Identity, patient: &Patient) -> Result<(), AccessError> {
    if can_view_patient(identity, patient) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

pub fn can_view_ambulance_request(identity: &Identity, request: &AmbulanceRequest) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::NursingHome => identity.entity_id == request.requested_by,
    }
}

pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), AccessError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}
