// src/process/os.rs

//! Real backend: OS pipes, `std::process::Command`, unbuffered stdout.

use std::fs::File;
use std::io::{self, PipeReader, PipeWriter};
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::command::CommandLine;

use super::{ChildProcess, ProcessBackend};

/// Backend used by the `rept` binary.
///
/// Output goes to a duplicate of the stdout descriptor wrapped in a `File`
/// rather than through `std::io::Stdout`, which line-buffers and would hold
/// back partial lines (and the broken-pipe error that comes with them).
#[derive(Debug)]
pub struct OsBackend {
    stdout: File,
}

impl OsBackend {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            stdout: raw_stdout()?,
        })
    }

    /// Backend writing to an arbitrary file, e.g. one end of a test pipe.
    pub fn with_output(stdout: File) -> Self {
        Self { stdout }
    }
}

impl ProcessBackend for OsBackend {
    type Reader = PipeReader;
    type WriteEnd = PipeWriter;
    type Child = OsChild;
    type Output = File;

    fn create_channel(&mut self) -> io::Result<(PipeReader, PipeWriter)> {
        io::pipe()
    }

    fn spawn(&mut self, command: &CommandLine, write_end: PipeWriter) -> io::Result<OsChild> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::from(write_end))
            .stderr(Stdio::inherit());

        let spawned = cmd.spawn();
        // `cmd` owns our copy of the write end; it has to go now or the
        // reader never sees end-of-stream.
        drop(cmd);

        let child = spawned?;
        debug!(pid = child.id(), "spawned child");
        Ok(OsChild { child })
    }

    fn output(&mut self) -> &mut File {
        &mut self.stdout
    }

    fn output_detached(&mut self) -> bool {
        output_detached(&self.stdout)
    }
}

/// A child started by [`OsBackend`].
#[derive(Debug)]
pub struct OsChild {
    child: Child,
}

impl ChildProcess for OsChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn wait(&mut self) -> io::Result<Option<i32>> {
        let status = self.child.wait()?;
        Ok(status.code())
    }
}

#[cfg(unix)]
fn raw_stdout() -> io::Result<File> {
    use std::os::fd::AsFd;

    let fd = io::stdout().as_fd().try_clone_to_owned()?;
    Ok(File::from(fd))
}

#[cfg(windows)]
fn raw_stdout() -> io::Result<File> {
    use std::os::windows::io::AsHandle;

    let handle = io::stdout().as_handle().try_clone_to_owned()?;
    Ok(File::from(handle))
}

/// Poll the output for an error/hang-up condition with a zero timeout.
///
/// The write end of a pipe whose reader has closed reports `POLLERR` on
/// Linux and `POLLHUP` on the BSDs.
#[cfg(unix)]
fn output_detached(out: &File) -> bool {
    use std::os::fd::AsFd;

    use nix::poll::{PollFd, PollFlags, PollTimeout, poll};

    let mut fds = [PollFd::new(out.as_fd(), PollFlags::empty())];
    match poll(&mut fds, PollTimeout::ZERO) {
        Ok(0) => false,
        Ok(_) => fds[0]
            .revents()
            .is_some_and(|r| r.intersects(PollFlags::POLLERR | PollFlags::POLLHUP)),
        Err(e) => {
            debug!(error = %e, "poll on stdout failed; assuming consumer attached");
            false
        }
    }
}

#[cfg(not(unix))]
fn output_detached(_out: &File) -> bool {
    false
}
