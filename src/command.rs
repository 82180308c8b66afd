// src/command.rs

//! The resolved command line that gets (re)spawned.

use std::ffi::{OsStr, OsString};
use std::fmt;

use crate::errors::{ReptError, Result};

/// Immutable, non-empty argument vector. The first element names the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<OsString>,
}

impl CommandLine {
    /// Build a command line from raw arguments.
    ///
    /// Fails if `argv` is empty or the program name is the empty string.
    /// Remaining arguments are kept verbatim, empty ones included.
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        match argv.first() {
            None => Err(ReptError::Usage("missing program".to_string())),
            Some(program) if program.is_empty() => {
                Err(ReptError::Usage("program name is empty".to_string()))
            }
            Some(_) => Ok(Self { argv }),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.argv.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
