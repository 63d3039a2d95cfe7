// models/src/reference.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::medical::{Clinic, CounselingResource, Hospital, Pro};

/// Shape of the seed/reference JSON file.
///
/// `patients` and `ambulance_requests` hold seed documents only; the live
/// records are in the patient collections and the ambulance table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub patients: Vec<Value>,
    #[serde(default)]
    pub ambulance_requests: Vec<Value>,
    #[serde(default)]
    pub pros: Vec<Pro>,
    #[serde(default, rename = "multispeciality_hospitals")]
    pub hospitals: Vec<Hospital>,
    #[serde(default)]
    pub nursing_homes: Vec<Clinic>,
    #[serde(default)]
    pub counseling_resources: Vec<CounselingResource>,
}

impl ReferenceData {
    pub fn hospital(&self, hospital_id: &str) -> Option<&Hospital> {
        self.hospitals.iter().find(|h| h.hospital_id == hospital_id)
    }

    pub fn hospital_mut(&mut self, hospital_id: &str) -> Option<&mut Hospital> {
        self.hospitals.iter_mut().find(|h| h.hospital_id == hospital_id)
    }

    /// Removes and returns the hospital, if present.
    pub fn remove_hospital(&mut self, hospital_id: &str) -> Option<Hospital> {
        let index = self.hospitals.iter().position(|h| h.hospital_id == hospital_id)?;
        Some(self.hospitals.remove(index))
    }

    /// Display name used on dashboards for an optional hospital reference.
    pub fn hospital_name(&self, hospital_id: Option<&str>) -> &str {
        hospital_id
            .and_then(|id| self.hospital(id))
            .map(|h| h.name.as_str())
            .unwrap_or("Not Assigned")
    }

    pub fn clinic(&self, clinic_id: &str) -> Option<&Clinic> {
        self.nursing_homes.iter().find(|c| c.clinic_id == clinic_id)
    }

    pub fn pro(&self, pro_id: &str) -> Option<&Pro> {
        self.pros.iter().find(|p| p.pro_id == pro_id)
    }

    pub fn pro_mut(&mut self, pro_id: &str) -> Option<&mut Pro> {
        self.pros.iter_mut().find(|p| p.pro_id == pro_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "patients": [],
        "multispeciality_hospitals": [
            {"hospital_id": "H001", "name": "City General", "location": "Downtown",
             "contact_number": "555", "total_beds": 10, "available_beds": 2,
             "icu_beds": {"total": 2, "available": 1}, "specialties": ["Cardiology"],
             "ambulance_services": true, "mental_health_support": false,
             "financial_assistance": false}
        ],
        "pros": [{"pro_id": "PRO1", "name": "Sam"}]
    }"#;

    #[test]
    fn missing_sections_default_to_empty() {
        let data: ReferenceData = serde_json::from_str(SEED).unwrap();
        assert!(data.nursing_homes.is_empty());
        assert!(data.counseling_resources.is_empty());
        assert_eq!(data.hospitals.len(), 1);
    }

    #[test]
    fn hospital_name_falls_back() {
        let data: ReferenceData = serde_json::from_str(SEED).unwrap();
        assert_eq!(data.hospital_name(Some("H001")), "City General");
        assert_eq!(data.hospital_name(Some("H404")), "Not Assigned");
        assert_eq!(data.hospital_name(None), "Not Assigned");
    }

    #[test]
    fn remove_hospital_returns_it() {
        let mut data: ReferenceData = serde_json::from_str(SEED).unwrap();
        assert_eq!(data.remove_hospital("H001").unwrap().name, "City General");
        assert!(data.remove_hospital("H001").is_none());
    }
}
