// src/config.rs

//! Resolved run configuration.
//!
//! Everything the supervisor needs is collected here once at startup and
//! passed down explicitly; nothing is kept in process-wide statics.

use crate::cli::CliArgs;
use crate::command::CommandLine;
use crate::drain::DEFAULT_BUFFER_SIZE;
use crate::errors::{ReptError, Result};

/// Name used as the prefix of operator-facing messages.
pub const PACKAGE: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Prefix for error messages, e.g. `rept: No such file or directory`.
    pub name: String,
    pub command: CommandLine,
    /// Size of the intermediate copy buffer. Must be non-zero.
    pub buffer_size: usize,
}

impl RunConfig {
    pub fn new(command: CommandLine) -> Self {
        Self {
            name: PACKAGE.to_string(),
            command,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let command = CommandLine::new(args.command)?;
        Ok(Self::new(command))
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(ReptError::Usage("buffer size must be non-zero".to_string()));
        }
        self.buffer_size = buffer_size;
        Ok(self)
    }
}
