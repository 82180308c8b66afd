// src/fake_backend.rs

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{self, ErrorKind, Read};
use std::sync::{Arc, Mutex};

use rept::command::CommandLine;
use rept::process::{ChildProcess, ProcessBackend};

use crate::scripted_io::{ChunkedReader, ChunkedWriter};

/// Lifecycle events, tagged with the channel / child number (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    ChannelCreated(u64),
    WriteEndClosed(u64),
    Spawned(u64),
    ReaderClosed(u64),
    Reaped(u64),
    /// A child handle was dropped without ever being waited on.
    Leaked(u64),
}

type EventLog = Arc<Mutex<Vec<BackendEvent>>>;

fn record(log: &EventLog, event: BackendEvent) {
    log.lock().unwrap().push(event);
}

/// A backend that doesn't spawn anything.
///
/// - each spawned "child" produces the next scripted output; once the script
///   runs out, children produce nothing (like `false`)
/// - forwarded bytes land in a [`ChunkedWriter`]
/// - every channel end and child records what happened to it
#[derive(Debug, Default)]
pub struct FakeBackend {
    scripts: VecDeque<ChunkedReader>,
    output: ChunkedWriter,
    channels: u64,
    spawns: u64,
    pipe_failure: Option<ErrorKind>,
    spawn_failure: Option<(u64, ErrorKind)>,
    wait_failure: Option<ErrorKind>,
    detach_after: Option<u64>,
    commands: Vec<Vec<OsString>>,
    log: EventLog,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child_output(self, data: impl Into<Vec<u8>>) -> Self {
        self.child_reader(ChunkedReader::new(data))
    }

    pub fn child_reader(mut self, reader: ChunkedReader) -> Self {
        self.scripts.push_back(reader);
        self
    }

    pub fn with_output(mut self, writer: ChunkedWriter) -> Self {
        self.output = writer;
        self
    }

    pub fn fail_pipe(mut self, kind: ErrorKind) -> Self {
        self.pipe_failure = Some(kind);
        self
    }

    /// Make the `nth` spawn (1-based) fail with `kind`.
    pub fn fail_spawn_at(mut self, nth: u64, kind: ErrorKind) -> Self {
        self.spawn_failure = Some((nth, kind));
        self
    }

    pub fn fail_wait(mut self, kind: ErrorKind) -> Self {
        self.wait_failure = Some(kind);
        self
    }

    /// Report the output as detached once `spawns` children have run.
    pub fn detach_after_spawns(mut self, spawns: u64) -> Self {
        self.detach_after = Some(spawns);
        self
    }

    pub fn spawns(&self) -> u64 {
        self.spawns
    }

    pub fn written(&self) -> &[u8] {
        self.output.written()
    }

    pub fn writer(&self) -> &ChunkedWriter {
        &self.output
    }

    pub fn commands(&self) -> &[Vec<OsString>] {
        &self.commands
    }

    pub fn events(&self) -> Vec<BackendEvent> {
        self.log.lock().unwrap().clone()
    }
}

/// Read end handed to the supervisor.
#[derive(Debug)]
pub struct FakeReader {
    id: u64,
    inner: ChunkedReader,
    log: EventLog,
}

impl Read for FakeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for FakeReader {
    fn drop(&mut self) {
        record(&self.log, BackendEvent::ReaderClosed(self.id));
    }
}

#[derive(Debug)]
pub struct FakeWriteEnd {
    id: u64,
    log: EventLog,
}

impl Drop for FakeWriteEnd {
    fn drop(&mut self) {
        record(&self.log, BackendEvent::WriteEndClosed(self.id));
    }
}

#[derive(Debug)]
pub struct FakeChild {
    id: u64,
    reaped: bool,
    wait_failure: Option<ErrorKind>,
    log: EventLog,
}

impl ChildProcess for FakeChild {
    fn id(&self) -> u32 {
        self.id as u32
    }

    fn wait(&mut self) -> io::Result<Option<i32>> {
        assert!(!self.reaped, "child {} waited on twice", self.id);
        self.reaped = true;
        record(&self.log, BackendEvent::Reaped(self.id));
        match self.wait_failure {
            Some(kind) => Err(kind.into()),
            None => Ok(Some(0)),
        }
    }
}

impl Drop for FakeChild {
    fn drop(&mut self) {
        if !self.reaped {
            record(&self.log, BackendEvent::Leaked(self.id));
        }
    }
}

impl ProcessBackend for FakeBackend {
    type Reader = FakeReader;
    type WriteEnd = FakeWriteEnd;
    type Child = FakeChild;
    type Output = ChunkedWriter;

    fn create_channel(&mut self) -> io::Result<(FakeReader, FakeWriteEnd)> {
        if let Some(kind) = self.pipe_failure {
            return Err(kind.into());
        }

        self.channels += 1;
        let id = self.channels;
        record(&self.log, BackendEvent::ChannelCreated(id));

        let inner = self.scripts.pop_front().unwrap_or_else(ChunkedReader::empty);
        let reader = FakeReader {
            id,
            inner,
            log: Arc::clone(&self.log),
        };
        let write_end = FakeWriteEnd {
            id,
            log: Arc::clone(&self.log),
        };
        Ok((reader, write_end))
    }

    fn spawn(&mut self, command: &CommandLine, write_end: FakeWriteEnd) -> io::Result<FakeChild> {
        let id = write_end.id;
        // The child "inherits" the write end; our copy goes away here.
        drop(write_end);

        if let Some((nth, kind)) = self.spawn_failure {
            if self.spawns + 1 == nth {
                return Err(kind.into());
            }
        }

        self.spawns += 1;
        self.commands.push(command.argv().to_vec());
        record(&self.log, BackendEvent::Spawned(id));

        Ok(FakeChild {
            id,
            reaped: false,
            wait_failure: self.wait_failure,
            log: Arc::clone(&self.log),
        })
    }

    fn output(&mut self) -> &mut ChunkedWriter {
        &mut self.output
    }

    fn output_detached(&mut self) -> bool {
        self.detach_after.is_some_and(|n| self.spawns >= n)
    }
}
