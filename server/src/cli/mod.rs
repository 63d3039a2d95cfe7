// server/src/cli/mod.rs

pub mod cli;
pub mod startup;

pub use cli::{start_cli, CliArgs, Commands};
