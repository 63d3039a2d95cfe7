// models/src/medical/pro.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A liaison officer from the reference file. Fields the service does not
/// use are carried in `details` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pro {
    pub pro_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub patients_assigned: Vec<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Pro {
    /// Records `patient_id` as assigned. Returns `false` if it already was.
    pub fn assign_patient(&mut self, patient_id: &str) -> bool {
        if self.patients_assigned.iter().any(|p| p == patient_id) {
            return false;
        }
        self.patients_assigned.push(patient_id.to_string());
        true
    }

    pub fn unassign_patient(&mut self, patient_id: &str) {
        self.patients_assigned.retain(|p| p != patient_id);
    }
}
