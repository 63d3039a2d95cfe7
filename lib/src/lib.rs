// lib/src/lib.rs

pub mod config;
pub mod credentials;
pub mod database;
pub mod errors;
pub mod reference_store;
pub mod storage_engine;

pub use crate::config::{load_config, CareSyncConfig};
pub use crate::database::{BootstrapReport, CareDatabase, PatientDetails};
pub use crate::errors::{CareError, CareResult};
pub use crate::reference_store::ReferenceStore;
pub use crate::storage_engine::open_sled_db;
