// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod interpolate;
pub mod logging;
pub mod sink;
pub mod socket;
pub mod stream;
pub mod types;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::RunParameters;
use crate::engine::dispatch;
use crate::errors::Result;

/// Resolve the run parameters from the CLI/environment layer and the
/// optional config file.
pub fn resolve_parameters(args: &CliArgs) -> Result<RunParameters> {
    config::resolve(args.raw_parameters(), args.config.as_deref())
}

/// High-level entry point used by `main.rs`.
///
/// Runs every requested channel and returns the exit code the process
/// should terminate with.
pub async fn run(params: RunParameters) -> Result<i32> {
    debug!(?params, "resolved run parameters");
    let outcome = dispatch(&params).await?;
    Ok(outcome.exit_code)
}
