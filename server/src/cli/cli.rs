// server/src/cli/cli.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lib::config::load_config;
use lib::CareSyncConfig;

use crate::cli::startup::{bootstrap_only, serve};

/// CLI entry point for CareSync
#[derive(Parser, Debug)]
#[command(name = "caresync")]
#[command(version = "0.1.0")]
#[command(about = "Clinic referral service for nursing homes and hospitals")]
pub struct CliArgs {
    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "CARESYNC_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,
    /// Directory holding the sled database and the reference file
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Provision seed clinics, the admin account, hospitals and seed
    /// patients, print what was created, then exit
    Bootstrap,
}

impl CliArgs {
    /// Command-line flags win over the file and the environment.
    pub fn apply_overrides(&self, config: &mut CareSyncConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_directory = dir.clone();
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn start_cli() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {}", e);
        }
    }
    init_tracing();

    let args = CliArgs::parse();
    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);

    match args.command.clone().unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Bootstrap => bootstrap_only(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = CliArgs::try_parse_from([
            "caresync", "--port", "8081", "--data-dir", "/tmp/caresync", "--host", "0.0.0.0",
        ])
        .unwrap();
        let mut config = CareSyncConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.data_directory, PathBuf::from("/tmp/caresync"));
        assert_eq!(args.command, None);
    }

    #[test]
    fn bootstrap_subcommand_parses() {
        let args = CliArgs::try_parse_from(["caresync", "-c", "caresync.yaml", "bootstrap"]).unwrap();
        assert_eq!(args.command, Some(Commands::Bootstrap));
        assert_eq!(args.config, Some(PathBuf::from("caresync.yaml")));
    }

    #[test]
    fn rejects_bad_port() {
        assert!(CliArgs::try_parse_from(["caresync", "--port", "http"]).is_err());
    }
}
