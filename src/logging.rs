// src/logging.rs

//! Logging setup for `rept` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from the `REPT_LOG` environment variable (e.g. "info",
//! "debug") and defaults to `warn`, so a normal run prints nothing of its own.
//!
//! Logs are sent to STDERR; stdout carries nothing but child output.

use anyhow::{Result, anyhow};
use tracing_subscriber::fmt;

pub const LOG_ENV_VAR: &str = "REPT_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging() -> Result<()> {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(tracing::Level::WARN);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    Ok(())
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
