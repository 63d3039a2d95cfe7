// models/src/identifiers.rs

use uuid::Uuid;

use crate::errors::{ValidationError, ValidationResult};

/// Longest entity id accepted. Clinic ids end up inside collection names.
pub const MAX_ENTITY_ID_LEN: usize = 64;

fn short_uuid() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Eight lower-case hex characters, e.g. `3f9c01ab`.
pub fn new_patient_id() -> String {
    short_uuid()
}

pub fn new_request_id() -> String {
    short_uuid()
}

/// `H` followed by eight upper-case hex characters.
pub fn new_hospital_id() -> String {
    format!("H{}", short_uuid().to_uppercase())
}

/// `CL` followed by eight upper-case hex characters.
pub fn new_clinic_id() -> String {
    format!("CL{}", short_uuid().to_uppercase())
}

pub fn new_resource_id() -> String {
    format!("CR{}", short_uuid().to_uppercase())
}

/// Login name provisioned for a clinic account.
pub fn clinic_username(clinic_id: &str) -> String {
    format!("clinic_{}", clinic_id.to_lowercase())
}

/// Checks an externally supplied entity id (clinic, hospital, patient, PRO).
///
/// Ids are 1 to 64 characters of ASCII alphanumerics, `-` or `_`.
pub fn validate_entity_id(value: &str) -> ValidationResult<&str> {
    let valid = !value.is_empty()
        && value.len() <= MAX_ENTITY_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(value)
    } else {
        Err(ValidationError::InvalidIdentifier(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_prefixed_ids() {
        let hospital = new_hospital_id();
        assert!(hospital.starts_with('H'));
        assert_eq!(hospital.len(), 9);
        assert_eq!(hospital, hospital.to_uppercase());

        let clinic = new_clinic_id();
        assert!(clinic.starts_with("CL"));
        assert_eq!(clinic.len(), 10);

        assert_eq!(new_patient_id().len(), 8);
        assert_ne!(new_request_id(), new_request_id());
    }

    #[test]
    fn should_derive_clinic_username() {
        assert_eq!(clinic_username("CL1A2B3C4D"), "clinic_cl1a2b3c4d");
    }

    #[test]
    fn should_reject_bad_entity_ids() {
        assert!(validate_entity_id("").is_err());
        assert!(validate_entity_id("a/b").is_err());
        assert!(validate_entity_id("clinic 1").is_err());
        assert!(validate_entity_id(&"x".repeat(MAX_ENTITY_ID_LEN + 1)).is_err());
    }

    #[test]
    fn should_accept_generated_ids() {
        let id = new_clinic_id();
        assert_eq!(validate_entity_id(&id), Ok(id.as_str()));
        assert!(validate_entity_id("NH_001-b").is_ok());
    }
}
