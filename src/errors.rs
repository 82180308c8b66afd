// src/errors.rs

//! Crate-wide error type and result alias.

use std::ffi::OsString;
use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReptError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("creating pipe failed: {0}")]
    Pipe(#[source] io::Error),

    #[error("{}: {source}", .program.to_string_lossy())]
    Spawn {
        program: OsString,
        #[source]
        source: io::Error,
    },

    #[error("waiting for child failed: {0}")]
    Wait(#[source] io::Error),

    #[error("{0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ReptError>;
