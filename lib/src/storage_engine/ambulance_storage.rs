// lib/src/storage_engine/ambulance_storage.rs

use async_trait::async_trait;
use sled::{Db, Tree};

use models::AmbulanceRequest;

use crate::errors::{CareError, CareResult};
use crate::storage_engine::storage_utils::{decode_row, encode_row};

#[async_trait]
pub trait AmbulanceStorageEngine: Send + Sync + 'static {
    async fn create(&self, request: &AmbulanceRequest) -> CareResult<()>;
    async fn get(&self, request_id: &str) -> CareResult<Option<AmbulanceRequest>>;
    /// Every request, oldest first.
    async fn list(&self) -> CareResult<Vec<AmbulanceRequest>>;
    /// Overwrites an existing request.
    async fn save(&self, request: &AmbulanceRequest) -> CareResult<()>;
    async fn delete(&self, request_id: &str) -> CareResult<()>;
}

pub struct SledAmbulanceStorage {
    tree: Tree,
}

impl SledAmbulanceStorage {
    pub fn new(db: &Db) -> CareResult<Self> {
        Ok(Self {
            tree: db.open_tree("ambulance_requests")?,
        })
    }
}

#[async_trait]
impl AmbulanceStorageEngine for SledAmbulanceStorage {
    async fn create(&self, request: &AmbulanceRequest) -> CareResult<()> {
        let bytes = encode_row(request)?;
        self.tree
            .compare_and_swap(request.request_id.as_bytes(), None::<&[u8]>, Some(bytes))?
            .map_err(|_| CareError::AlreadyExists(format!("ambulance request {}", request.request_id)))?;
        Ok(())
    }

    async fn get(&self, request_id: &str) -> CareResult<Option<AmbulanceRequest>> {
        self.tree
            .get(request_id.as_bytes())?
            .map(|bytes| decode_row(&bytes))
            .transpose()
    }

    async fn list(&self) -> CareResult<Vec<AmbulanceRequest>> {
        let mut requests: Vec<AmbulanceRequest> = Vec::new();
        for item in self.tree.iter() {
            let (_key, value) = item?;
            requests.push(decode_row(&value)?);
        }
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(requests)
    }

    async fn save(&self, request: &AmbulanceRequest) -> CareResult<()> {
        let key = request.request_id.as_bytes();
        if !self.tree.contains_key(key)? {
            return Err(CareError::NotFound(format!("ambulance request {}", request.request_id)));
        }
        self.tree.insert(key, encode_row(request)?)?;
        Ok(())
    }

    async fn delete(&self, request_id: &str) -> CareResult<()> {
        self.tree.remove(request_id.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{AmbulanceRequestDraft, AmbulanceStatus};

    fn request(patient: &str, clinic: &str) -> AmbulanceRequest {
        AmbulanceRequestDraft {
            pickup_location: Some("Sunrise Care".into()),
            drop_location: Some("City General".into()),
        }
        .into_request(patient, clinic)
        .unwrap()
    }

    #[tokio::test]
    async fn list_returns_every_request() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let storage = SledAmbulanceStorage::new(&db).unwrap();
        let first = request("p1", "NH001");
        storage.create(&first).await.unwrap();
        storage.create(&request("p2", "NH002")).await.unwrap();
        let listed = storage.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].request_id, first.request_id);
        assert!(matches!(storage.create(&first).await, Err(CareError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn save_persists_resolution() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let storage = SledAmbulanceStorage::new(&db).unwrap();
        let mut req = request("p1", "NH001");
        storage.create(&req).await.unwrap();
        req.resolve();
        storage.save(&req).await.unwrap();
        let stored = storage.get(&req.request_id).await.unwrap().unwrap();
        assert_eq!(stored.status, AmbulanceStatus::Resolved);
        storage.delete(&req.request_id).await.unwrap();
        assert!(storage.get(&req.request_id).await.unwrap().is_none());
    }
}
