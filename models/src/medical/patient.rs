// models/src/medical/patient.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::form::{optional, parse_medical_history, required};
use crate::identifiers::{new_patient_id, validate_entity_id};

pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 120;

/// Where a referred patient currently is. Values the service does not know
/// are kept verbatim so seed documents survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatientStatus {
    #[default]
    Pending,
    InTransit,
    Admitted,
    Discharged,
    Other(String),
}

impl PatientStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PatientStatus::Pending => "Pending",
            PatientStatus::InTransit => "In Transit",
            PatientStatus::Admitted => "Admitted",
            PatientStatus::Discharged => "Discharged",
            PatientStatus::Other(s) => s,
        }
    }
}

impl From<String> for PatientStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => PatientStatus::Pending,
            "In Transit" => PatientStatus::InTransit,
            "Admitted" => PatientStatus::Admitted,
            "Discharged" => PatientStatus::Discharged,
            _ => PatientStatus::Other(value),
        }
    }
}

impl From<PatientStatus> for String {
    fn from(value: PatientStatus) -> Self {
        match value {
            PatientStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient document, stored in the collection of the clinic that referred it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub contact_number: String,
    pub address: String,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub current_status: PatientStatus,
    #[serde(default)]
    pub assigned_hospital_id: Option<String>,
    /// Clinic id of the owning nursing home.
    pub referred_by: String,
    #[serde(default)]
    pub assigned_pro_id: Option<String>,
    #[serde(default = "Utc::now", with = "crate::timestamps::lenient")]
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn is_referred_by(&self, clinic_id: &str) -> bool {
        self.referred_by == clinic_id
    }

    pub fn mark_in_transit(&mut self) {
        self.current_status = PatientStatus::InTransit;
    }
}

/// Raw add-patient form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientDraft {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub assigned_hospital_id: Option<String>,
    /// Owning clinic when an administrator files the referral. Ignored for
    /// nursing homes, whose session decides ownership.
    pub clinic_id: Option<String>,
}

/// Parses an age field; the accepted range is inclusive on both ends.
pub fn parse_age(raw: Option<&str>) -> ValidationResult<u8> {
    let age: i64 = raw
        .map(str::trim)
        .ok_or(ValidationError::InvalidAge)?
        .parse()
        .map_err(|_| ValidationError::InvalidAge)?;
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }
    Ok(age as u8)
}

impl PatientDraft {
    /// Validates the form and builds a new `Pending` patient owned by
    /// `referred_by`, the clinic id taken from the caller's session.
    pub fn into_patient(self, referred_by: Option<&str>) -> ValidationResult<Patient> {
        let name = required(self.name, "Patient name")?;
        let age = parse_age(self.age.as_deref())?;
        let gender = required(self.gender, "Gender")?;
        let contact_number = required(self.contact_number, "Contact number")?;
        let address = required(self.address, "Address")?;
        let medical_history = self
            .medical_history
            .as_deref()
            .map(parse_medical_history)
            .unwrap_or_default();
        let assigned_hospital_id = required(self.assigned_hospital_id, "Hospital assignment")?;
        let referred_by = optional(referred_by.map(str::to_string))
            .ok_or(ValidationError::MissingField("Clinic ID"))?;
        validate_entity_id(&referred_by)?;

        Ok(Patient {
            patient_id: new_patient_id(),
            name,
            age,
            gender,
            contact_number,
            address,
            medical_history,
            current_status: PatientStatus::Pending,
            assigned_hospital_id: Some(assigned_hospital_id),
            referred_by,
            assigned_pro_id: None,
            created_at: Utc::now(),
        })
    }
}
