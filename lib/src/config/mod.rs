// lib/src/config/mod.rs

pub mod config_defaults;
pub mod config_helpers;
pub mod config_structs;

pub use config_defaults::*;
pub use config_helpers::{apply_env_overrides, load_config};
pub use config_structs::{AdminConfig, CareSyncConfig, ServerConfig, SessionConfig, StorageConfig};
