// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod drain;
pub mod errors;
pub mod logging;
pub mod process;
pub mod supervisor;

use tracing::debug;

use crate::config::RunConfig;
use crate::errors::{ReptError, Result};
use crate::process::OsBackend;
use crate::supervisor::{Summary, Supervisor};

/// High-level entry point used by `main.rs`.
///
/// Wires the real OS backend (pipes, child processes, our stdout) to the
/// supervisor and runs until the consumer of stdout goes away.
pub fn run(config: &RunConfig) -> Result<Summary> {
    let backend = OsBackend::new().map_err(ReptError::Io)?;
    debug!(buffer_size = config.buffer_size, "using OS backend");

    let mut supervisor = Supervisor::new(backend, config);
    supervisor.run()
}
