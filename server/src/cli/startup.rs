// server/src/cli/startup.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use lib::{CareDatabase, CareSyncConfig};

/// Opens both stores and brings them in line with the reference file.
pub async fn open_database(config: &CareSyncConfig) -> Result<CareDatabase> {
    let db = CareDatabase::open(&config.storage).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.storage.data_directory.display()
        )
    })?;
    db.bootstrap(&config.admin)
        .await
        .context("Failed to provision seed data")?;
    Ok(db)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal.");
}

pub async fn serve(config: CareSyncConfig) -> Result<()> {
    if config.session.uses_default_secret() {
        warn!("Using the built-in session secret; set CARESYNC_SESSION_SECRET in production");
    }
    let db = Arc::new(open_database(&config).await?);
    rest_api::start_server(&config, Arc::clone(&db), shutdown_signal()).await?;
    db.flush().await.context("Failed to flush the database on shutdown")?;
    Ok(())
}

pub async fn bootstrap_only(config: CareSyncConfig) -> Result<()> {
    let db = CareDatabase::open(&config.storage).context("Failed to open data directory")?;
    let report = db
        .bootstrap(&config.admin)
        .await
        .context("Failed to provision seed data")?;
    db.flush().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_data_directory_is_initialised() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CareSyncConfig::default();
        config.storage.data_directory = dir.path().join("data");
        let db = open_database(&config).await.unwrap();
        assert!(config.storage.reference_path().exists());
        assert!(db.hospitals().await.is_empty());
    }
}
