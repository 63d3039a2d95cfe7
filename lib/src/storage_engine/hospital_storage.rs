// lib/src/storage_engine/hospital_storage.rs

use async_trait::async_trait;
use sled::{Db, Tree};

use models::Hospital;

use crate::errors::CareResult;
use crate::storage_engine::storage_utils::encode_row;

/// Relational mirror of the hospital directory.
#[async_trait]
pub trait HospitalTable: Send + Sync + 'static {
    /// Inserts or replaces the row for `hospital.hospital_id`.
    async fn upsert(&self, hospital: &Hospital) -> CareResult<()>;
    /// Deletes a row, returning whether it existed.
    async fn delete(&self, hospital_id: &str) -> CareResult<bool>;
    async fn count(&self) -> CareResult<usize>;
}

pub struct SledHospitalTable {
    tree: Tree,
}

impl SledHospitalTable {
    pub fn new(db: &Db) -> CareResult<Self> {
        Ok(Self {
            tree: db.open_tree("hospitals")?,
        })
    }
}

#[async_trait]
impl HospitalTable for SledHospitalTable {
    async fn upsert(&self, hospital: &Hospital) -> CareResult<()> {
        let bytes = encode_row(hospital)?;
        self.tree.insert(hospital.hospital_id.as_bytes(), bytes)?;
        Ok(())
    }

    async fn delete(&self, hospital_id: &str) -> CareResult<bool> {
        Ok(self.tree.remove(hospital_id.as_bytes())?.is_some())
    }

    async fn count(&self) -> CareResult<usize> {
        Ok(self.tree.len())
    }
}
