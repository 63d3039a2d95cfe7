// lib/src/config/config_helpers.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::config_defaults::{ENV_ADMIN_PASSWORD, ENV_DATA_DIR, ENV_SESSION_SECRET};
use crate::config::config_structs::CareSyncConfig;
use crate::errors::{CareError, CareResult};

/// Loads the YAML configuration at `path`, or the defaults when no path is
/// given. Environment overrides are applied on top.
pub fn load_config(path: Option<&Path>) -> CareResult<CareSyncConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                CareError::ConfigurationError(format!(
                    "Failed to read config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let parsed: CareSyncConfig = serde_yaml::from_str(&content).map_err(|e| {
                CareError::ConfigurationError(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            info!("Loaded configuration from {}", path.display());
            parsed
        }
        None => {
            debug!("No config file given, using defaults");
            CareSyncConfig::default()
        }
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// Applies `CARESYNC_*` overrides read through `lookup`. Empty values are
/// ignored.
pub fn apply_env_overrides<F>(config: &mut CareSyncConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(secret) = get(ENV_SESSION_SECRET) {
        config.session.secret = secret;
    }
    if let Some(dir) = get(ENV_DATA_DIR) {
        config.storage.data_directory = PathBuf::from(dir);
    }
    if let Some(password) = get(ENV_ADMIN_PASSWORD) {
        config.admin.password = Some(password);
    }
}

fn validate(config: &CareSyncConfig) -> CareResult<()> {
    if config.session.secret.is_empty() {
        return Err(CareError::ConfigurationError("session secret must not be empty".into()));
    }
    if config.session.ttl_hours <= 0 {
        return Err(CareError::ConfigurationError(format!(
            "session ttl_hours must be positive, got {}",
            config.session.ttl_hours
        )));
    }
    if config.storage.reference_file.trim().is_empty() {
        return Err(CareError::ConfigurationError("reference_file must not be empty".into()));
    }
    Ok(())
}
