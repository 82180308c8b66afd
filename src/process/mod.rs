// src/process/mod.rs

//! Process and pipe primitives behind a single backend trait.
//!
//! The supervisor is written once against [`ProcessBackend`]. Production code
//! uses [`OsBackend`]; tests can provide their own implementation that hands
//! out in-memory readers and fake children instead of real processes.
//!
//! - [`os`] wraps `std::process` and `std::io::pipe`, with the few
//!   platform-specific pieces (raw stdout, detach check) behind `cfg`.

use std::io::{self, Read, Write};

use crate::command::CommandLine;

pub mod os;

pub use os::{OsBackend, OsChild};

/// Trait abstracting how channels are created and children are started.
pub trait ProcessBackend {
    /// Read end of a channel.
    type Reader: Read;
    /// Write end of a channel, handed to the child as its stdout.
    type WriteEnd;
    type Child: ChildProcess;
    /// Where forwarded bytes go (our own stdout in production).
    type Output: Write;

    /// Create a fresh anonymous pipe.
    fn create_channel(&mut self) -> io::Result<(Self::Reader, Self::WriteEnd)>;

    /// Start `command` with its stdout redirected to `write_end` and stdin /
    /// stderr inherited.
    ///
    /// `write_end` is consumed: once this returns, the caller no longer holds
    /// a copy of it, so the reader sees end-of-stream as soon as the child
    /// closes its side.
    fn spawn(&mut self, command: &CommandLine, write_end: Self::WriteEnd)
    -> io::Result<Self::Child>;

    fn output(&mut self) -> &mut Self::Output;

    /// Best-effort check whether the reader of [`ProcessBackend::output`] has
    /// gone away, without writing anything.
    ///
    /// Used between children; a backend that cannot tell returns `false`.
    /// [`OsBackend`] can only tell on Unix (via `poll(2)`). On other
    /// platforms a command that never writes keeps being respawned after the
    /// consumer has gone, since no failing write ever reveals it.
    fn output_detached(&mut self) -> bool {
        false
    }
}

/// A spawned child that must be waited on exactly once.
pub trait ChildProcess {
    fn id(&self) -> u32;

    /// Block until the child exits and return its exit code, if it had one
    /// (`None` when it was killed by a signal).
    fn wait(&mut self) -> io::Result<Option<i32>>;
}
