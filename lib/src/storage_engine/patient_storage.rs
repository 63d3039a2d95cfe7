// lib/src/storage_engine/patient_storage.rs
//
// One sled tree per referring clinic, holding JSON patient documents keyed
// by patient id.

use sled::{Db, Tree};
use tracing::warn;

use models::identifiers::validate_entity_id;
use models::Patient;
use security::PatientScope;

use crate::errors::{CareError, CareResult};
use crate::storage_engine::storage_utils::{decode_document, encode_document};

const COLLECTION_PREFIX: &str = "clinic_";
const COLLECTION_SUFFIX: &str = "_patients";

/// Name of the collection holding the patients referred by `clinic_id`.
pub fn collection_name(clinic_id: &str) -> String {
    format!("{}{}{}", COLLECTION_PREFIX, clinic_id, COLLECTION_SUFFIX)
}

fn clinic_of_collection(name: &[u8]) -> Option<String> {
    let name = std::str::from_utf8(name).ok()?;
    let id = name.strip_prefix(COLLECTION_PREFIX)?.strip_suffix(COLLECTION_SUFFIX)?;
    validate_entity_id(id).ok().map(str::to_string)
}

#[derive(Clone)]
pub struct PatientCollections {
    db: Db,
}

impl PatientCollections {
    pub fn new(db: Db) -> Self {
        PatientCollections { db }
    }

    fn collection(&self, clinic_id: &str) -> CareResult<Tree> {
        validate_entity_id(clinic_id)?;
        Ok(self.db.open_tree(collection_name(clinic_id))?)
    }

    /// Clinic ids that have a patient collection.
    pub fn clinic_ids(&self) -> Vec<String> {
        self.db
            .tree_names()
            .iter()
            .filter_map(|name| clinic_of_collection(name))
            .collect()
    }

    /// Inserts a new document into its owner's collection. Patient ids are
    /// unique per collection.
    pub fn insert(&self, patient: &Patient) -> CareResult<()> {
        validate_entity_id(&patient.patient_id)?;
        let tree = self.collection(&patient.referred_by)?;
        let bytes = encode_document(patient)?;
        tree.compare_and_swap(patient.patient_id.as_bytes(), None::<&[u8]>, Some(bytes))?
            .map_err(|_| {
                CareError::AlreadyExists(format!(
                    "patient {} in {}",
                    patient.patient_id,
                    collection_name(&patient.referred_by)
                ))
            })?;
        Ok(())
    }

    /// Replaces an existing document. Fails with `NotFound` when the
    /// patient is not in its owner's collection.
    pub fn replace(&self, patient: &Patient) -> CareResult<()> {
        let tree = self.collection(&patient.referred_by)?;
        let key = patient.patient_id.as_bytes();
        if !tree.contains_key(key)? {
            return Err(CareError::NotFound(format!("patient {}", patient.patient_id)));
        }
        tree.insert(key, encode_document(patient)?)?;
        Ok(())
    }

    pub fn get(&self, clinic_id: &str, patient_id: &str) -> CareResult<Option<Patient>> {
        let tree = self.collection(clinic_id)?;
        tree.get(patient_id.as_bytes())?
            .map(|bytes| decode_document(&bytes))
            .transpose()
    }

    /// Looks a patient up inside the collections the scope admits.
    pub fn find(&self, scope: &PatientScope, patient_id: &str) -> CareResult<Option<Patient>> {
        match scope {
            PatientScope::Clinic(clinic_id) => self.get(clinic_id, patient_id),
            PatientScope::All => {
                for clinic_id in self.clinic_ids() {
                    if let Some(patient) = self.get(&clinic_id, patient_id)? {
                        return Ok(Some(patient));
                    }
                }
                Ok(None)
            }
        }
    }

    /// All patients the scope admits, oldest first. Undecodable documents
    /// are skipped with a warning.
    pub fn list(&self, scope: &PatientScope) -> CareResult<Vec<Patient>> {
        let clinic_ids = match scope {
            PatientScope::Clinic(clinic_id) => vec![clinic_id.clone()],
            PatientScope::All => self.clinic_ids(),
        };
        let mut patients = Vec::new();
        for clinic_id in clinic_ids {
            let tree = self.collection(&clinic_id)?;
            for item in tree.iter() {
                let (key, value) = item?;
                match decode_document::<Patient>(&value) {
                    Ok(patient) => patients.push(patient),
                    Err(e) => warn!(
                        "Skipping unreadable patient document {} in {}: {}",
                        String::from_utf8_lossy(&key),
                        collection_name(&clinic_id),
                        e
                    ),
                }
            }
        }
        patients.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(patients)
    }
}
