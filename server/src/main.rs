// server/src/main.rs

use anyhow::Result;
use caresync_server::cli::start_cli;

#[tokio::main]
async fn main() -> Result<()> {
    start_cli().await
}
