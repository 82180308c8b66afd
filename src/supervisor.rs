// src/supervisor.rs

//! The spawn / drain / reap / respawn loop.
//!
//! One iteration ([`Supervisor::step`]):
//! 1. create a fresh channel and spawn the command with its stdout on the
//!    channel's write end,
//! 2. drain the read end into the backend's output,
//! 3. release the read end, then wait for the child.
//!
//! [`Supervisor::run`] repeats that until the consumer of our output is gone
//! (success) or something fatal happens (error). Spawn failures are never
//! retried.

use tracing::{debug, info, warn};

use crate::command::CommandLine;
use crate::config::RunConfig;
use crate::drain::{DrainOutcome, drain_with_buffer};
use crate::errors::{ReptError, Result};
use crate::process::{ChildProcess, ProcessBackend};

/// What the loop should do after one child has been reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The child ran out of output and the consumer is (as far as we know)
    /// still there.
    Respawn,
    /// The consumer closed its end; stop with success.
    Stop,
}

/// Counters over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub spawns: u64,
    pub bytes: u64,
}

pub struct Supervisor<B: ProcessBackend> {
    backend: B,
    command: CommandLine,
    buffer: Vec<u8>,
    summary: Summary,
}

impl<B: ProcessBackend> Supervisor<B> {
    pub fn new(backend: B, config: &RunConfig) -> Self {
        Self {
            backend,
            command: config.command.clone(),
            buffer: vec![0u8; config.buffer_size.max(1)],
            summary: Summary::default(),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run children back to back until the consumer goes away.
    ///
    /// Returns `Ok` only when the consumer closed; every other way out is an
    /// error.
    pub fn run(&mut self) -> Result<Summary> {
        info!(command = %self.command, "starting");

        loop {
            match self.step()? {
                Step::Stop => break,
                Step::Respawn if self.backend.output_detached() => {
                    debug!("output detached between children");
                    break;
                }
                Step::Respawn => {}
            }
        }

        info!(
            spawns = self.summary.spawns,
            bytes = self.summary.bytes,
            "consumer closed; stopping"
        );
        Ok(self.summary)
    }

    /// Run a single child to completion and decide what comes next.
    pub fn step(&mut self) -> Result<Step> {
        let (mut reader, write_end) = self.backend.create_channel().map_err(ReptError::Pipe)?;

        let mut child = self
            .backend
            .spawn(&self.command, write_end)
            .map_err(|source| ReptError::Spawn {
                program: self.command.program().to_os_string(),
                source,
            })?;
        self.summary.spawns += 1;

        let pid = child.id();
        debug!(pid, spawn = self.summary.spawns, "draining child output");

        let report = drain_with_buffer(&mut reader, self.backend.output(), &mut self.buffer);
        self.summary.bytes += report.bytes;

        // Close our end before waiting: a child still writing then gets
        // EPIPE instead of blocking on a full pipe forever.
        drop(reader);
        let waited = child.wait();

        match (report.outcome, waited) {
            (DrainOutcome::Fatal(err), waited) => {
                if let Err(wait_err) = waited {
                    warn!(pid, error = %wait_err, "waiting for child failed");
                }
                Err(ReptError::Io(err))
            }
            (_, Err(err)) => Err(ReptError::Wait(err)),
            (DrainOutcome::ConsumerClosed, Ok(code)) => {
                debug!(pid, ?code, bytes = report.bytes, "consumer closed");
                Ok(Step::Stop)
            }
            (DrainOutcome::Exhausted, Ok(code)) => {
                debug!(pid, ?code, bytes = report.bytes, "child output exhausted");
                Ok(Step::Respawn)
            }
        }
    }
}
