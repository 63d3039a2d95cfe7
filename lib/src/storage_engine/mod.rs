// lib/src/storage_engine/mod.rs

pub mod account_storage;
pub mod ambulance_storage;
pub mod hospital_storage;
pub mod patient_storage;
pub mod storage_utils;

use std::fs;
use std::path::Path;

use sled::Db;
use tracing::info;

use crate::errors::{CareError, CareResult};

pub use account_storage::{AccountStorageEngine, SledAccountStorage};
pub use ambulance_storage::{AmbulanceStorageEngine, SledAmbulanceStorage};
pub use hospital_storage::{HospitalTable, SledHospitalTable};
pub use patient_storage::{collection_name, PatientCollections};

/// Opens (or creates) the sled database at `path`.
pub fn open_sled_db(path: &Path, cache_capacity: u64) -> CareResult<Db> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let db = sled::Config::new()
        .path(path)
        .cache_capacity(cache_capacity)
        .open()
        .map_err(|e| CareError::DatabaseError(format!("Failed to open sled at {}: {}", path.display(), e)))?;
    info!("Opened sled database at {}", path.display());
    Ok(db)
}
