// lib/src/reference_store.rs

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::sync::{Mutex, RwLock};
use tokio::task;
use tracing::{error, info, warn};

use models::ReferenceData;

use crate::errors::{CareError, CareResult};

/// The reference-data file and its in-memory copy.
///
/// Mutations run on a working copy that becomes the live copy only after it
/// has been written to disk, so memory and disk never diverge. Writers queue
/// on `writer`; readers keep seeing the previous copy while a write is on
/// disk.
pub struct ReferenceStore {
    path: PathBuf,
    data: RwLock<ReferenceData>,
    writer: Mutex<()>,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Renders the document with four-space indentation.
pub fn render(data: &ReferenceData) -> CareResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut serializer)?;
    Ok(out)
}

impl ReferenceStore {
    /// Loads the file at `path`. A missing file is created with the empty
    /// document; an unreadable one is logged and left on disk untouched
    /// while the service runs on the empty document.
    pub fn open(path: impl Into<PathBuf>) -> CareResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            match fs::read(&path).map_err(CareError::from).and_then(|bytes| {
                serde_json::from_slice::<ReferenceData>(&bytes).map_err(CareError::from)
            }) {
                Ok(data) => {
                    info!(
                        "Loaded reference data from {}: {} hospitals, {} clinics, {} PROs",
                        path.display(),
                        data.hospitals.len(),
                        data.nursing_homes.len(),
                        data.pros.len()
                    );
                    data
                }
                Err(e) => {
                    error!("Could not load reference data from {}: {}", path.display(), e);
                    ReferenceData::default()
                }
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let data = ReferenceData::default();
            write_atomically(&path, &data)?;
            info!("Created empty reference data file at {}", path.display());
            data
        };
        Ok(ReferenceStore {
            path,
            data: RwLock::new(data),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        sibling(&self.path, ".backup")
    }

    pub fn temp_path(&self) -> PathBuf {
        sibling(&self.path, ".temp")
    }

    pub async fn snapshot(&self) -> ReferenceData {
        self.data.read().await.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&ReferenceData) -> R) -> R {
        let guard = self.data.read().await;
        f(&guard)
    }

    /// Applies `f` and persists the result. If `f` fails or the write
    /// fails, neither the live copy nor the file changes.
    pub async fn mutate<R, F>(&self, f: F) -> CareResult<R>
    where
        F: FnOnce(&mut ReferenceData) -> CareResult<R>,
    {
        let _writer = self.writer.lock().await;
        let mut working = self.data.read().await.clone();
        let out = f(&mut working)?;

        let path = self.path.clone();
        let working =
            task::spawn_blocking(move || write_atomically(&path, &working).map(|()| working)).await??;
        *self.data.write().await = working;
        Ok(out)
    }
}

/// Backup, write to `<file>.temp`, read back, then rename over the file.
fn write_atomically(path: &Path, data: &ReferenceData) -> CareResult<()> {
    let backup = sibling(path, ".backup");
    let temp = sibling(path, ".temp");

    if path.exists() {
        if let Err(e) = fs::copy(path, &backup) {
            warn!("Could not refresh backup {}: {}", backup.display(), e);
        }
    }

    let result = write_temp(&temp, data).and_then(|()| {
        fs::rename(&temp, path).map_err(|e| {
            CareError::Persistence(format!("rename {} -> {}: {}", temp.display(), path.display(), e))
        })
    });
    if let Err(e) = &result {
        error!("Reference data write to {} failed: {}", path.display(), e);
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_temp(temp: &Path, data: &ReferenceData) -> CareResult<()> {
    let bytes = render(data)?;
    let persist = |e: std::io::Error| CareError::Persistence(format!("{}: {}", temp.display(), e));
    let mut file = File::create(temp).map_err(persist)?;
    file.write_all(&bytes).map_err(persist)?;
    file.sync_all().map_err(persist)?;
    drop(file);

    let written = fs::read(temp).map_err(persist)?;
    serde_json::from_slice::<ReferenceData>(&written)
        .map_err(|e| CareError::Persistence(format!("verification of {} failed: {}", temp.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::HospitalDraft;

    fn hospital(id: &str) -> models::Hospital {
        HospitalDraft {
            name: Some("City General".into()),
            location: Some("Downtown".into()),
            contact_number: Some("555".into()),
            total_beds: Some("20".into()),
            available_beds: Some("3".into()),
            icu_total: Some("2".into()),
            icu_available: Some("0".into()),
            specialties: Some("Oncology".into()),
            ..Default::default()
        }
        .into_hospital(id.to_string())
        .unwrap()
    }

    #[tokio::test]
    async fn missing_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let store = ReferenceStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.snapshot().await, ReferenceData::default());
        let on_disk: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["multispeciality_hospitals"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn invalid_file_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = ReferenceStore::open(&path).unwrap();
        assert!(store.snapshot().await.hospitals.is_empty());
        assert_eq!(fs::read(&path).unwrap(), b"{ not json");
    }

    #[tokio::test]
    async fn mutate_writes_backup_and_indents_four_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::open(dir.path().join("seed.json")).unwrap();
        store
            .mutate(|data| {
                data.hospitals.push(hospital("H001"));
                Ok(())
            })
            .await
            .unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n    \"multispeciality_hospitals\""));
        assert!(store.backup_path().exists());
        assert!(!store.temp_path().exists());
        let reloaded = ReferenceStore::open(store.path()).unwrap();
        assert_eq!(reloaded.snapshot().await.hospitals.len(), 1);
    }

    #[tokio::test]
    async fn failed_write_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::open(dir.path().join("seed.json")).unwrap();
        store
            .mutate(|data| {
                data.hospitals.push(hospital("H001"));
                Ok(())
            })
            .await
            .unwrap();
        let before_bytes = fs::read(store.path()).unwrap();
        let before_data = store.snapshot().await;

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(store.temp_path()).unwrap();
        let result = store
            .mutate(|data| {
                data.hospitals.push(hospital("H002"));
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(CareError::Persistence(_))));
        assert_eq!(fs::read(store.path()).unwrap(), before_bytes);
        assert_eq!(store.snapshot().await, before_data);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_mutations_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(ReferenceStore::open(dir.path().join("seed.json")).unwrap());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .mutate(move |data| {
                        data.hospitals.push(hospital(&format!("H10{}", i)));
                        Ok(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.snapshot().await.hospitals.len(), 8);
        let reloaded = ReferenceStore::open(store.path()).unwrap();
        assert_eq!(reloaded.snapshot().await.hospitals.len(), 8);
    }

    #[tokio::test]
    async fn readers_are_served_while_a_write_is_queued() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::open(dir.path().join("seed.json")).unwrap();
        let _writer = store.writer.lock().await;
        let hospitals = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            store.read(|data| data.hospitals.len()),
        )
        .await
        .unwrap();
        assert_eq!(hospitals, 0);
    }

    #[tokio::test]
    async fn closure_error_discards_working_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::open(dir.path().join("seed.json")).unwrap();
        let result: CareResult<()> = store
            .mutate(|data| {
                data.hospitals.push(hospital("H009"));
                Err(CareError::NotFound("hospital".into()))
            })
            .await;
        assert!(result.is_err());
        assert!(store.snapshot().await.hospitals.is_empty());
    }
}
