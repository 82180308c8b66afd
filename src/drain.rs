// src/drain.rs

//! Copying a child's output to our own stdout.
//!
//! [`drain`] moves bytes from a reader to a writer through a fixed buffer and
//! classifies how the copy ended. Only three verdicts leave this module; the
//! supervisor never looks at raw error codes itself.

use std::io::{self, ErrorKind, Read, Write};

use tracing::trace;

/// Copy buffer size used unless configured otherwise.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

// Win32 codes for a pipe whose other end is gone. std usually maps both to
// `BrokenPipe` already; they are only consulted on Windows.
const ERROR_BROKEN_PIPE: i32 = 109;
const ERROR_NO_DATA: i32 = 232;

/// How a drain ended.
#[derive(Debug)]
pub enum DrainOutcome {
    /// The source reached end-of-stream; the child closed its output.
    Exhausted,
    /// The destination refused a write because its reader is gone.
    ConsumerClosed,
    /// Any other I/O failure on either side.
    Fatal(io::Error),
}

impl DrainOutcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, DrainOutcome::Exhausted)
    }

    pub fn is_consumer_closed(&self) -> bool {
        matches!(self, DrainOutcome::ConsumerClosed)
    }
}

/// Outcome of a drain plus the number of bytes fully written.
#[derive(Debug)]
pub struct DrainReport {
    pub outcome: DrainOutcome,
    pub bytes: u64,
}

/// Copy everything from `src` to `dst` with a [`DEFAULT_BUFFER_SIZE`] buffer.
pub fn drain<R, W>(src: &mut R, dst: &mut W) -> DrainReport
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; DEFAULT_BUFFER_SIZE];
    drain_with_buffer(src, dst, &mut buf)
}

/// Copy everything from `src` to `dst` using `buf` as the intermediate
/// buffer.
///
/// Each chunk is completely written and flushed before the next read, so
/// memory use is bounded by `buf` no matter how much the source produces.
///
/// # Panics
///
/// Panics if `buf` is empty.
pub fn drain_with_buffer<R, W>(src: &mut R, dst: &mut W, buf: &mut [u8]) -> DrainReport
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    assert!(!buf.is_empty(), "drain buffer must not be empty");

    let mut bytes: u64 = 0;
    loop {
        let len = match read_chunk(src, buf) {
            Ok(0) => {
                return DrainReport {
                    outcome: DrainOutcome::Exhausted,
                    bytes,
                };
            }
            Ok(len) => len,
            Err(err) => {
                return DrainReport {
                    outcome: DrainOutcome::Fatal(err),
                    bytes,
                };
            }
        };

        match write_chunk(dst, &buf[..len], &mut bytes) {
            Ok(()) => trace!(len, total = bytes, "forwarded chunk"),
            Err(err) if is_consumer_closed(&err) => {
                return DrainReport {
                    outcome: DrainOutcome::ConsumerClosed,
                    bytes,
                };
            }
            Err(err) => {
                return DrainReport {
                    outcome: DrainOutcome::Fatal(err),
                    bytes,
                };
            }
        }
    }
}

/// Single read, retried while interrupted. A closed source reads as `Ok(0)`.
fn read_chunk<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match src.read(buf) {
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if is_source_closed(&err) => return Ok(0),
            Err(err) => return Err(err),
        }
    }
}

/// Write all of `chunk`, surviving short writes and interrupts, then flush.
/// `written` is advanced by every byte the destination accepted.
fn write_chunk<W: Write + ?Sized>(dst: &mut W, chunk: &[u8], written: &mut u64) -> io::Result<()> {
    let mut rest = chunk;
    while !rest.is_empty() {
        match dst.write(rest) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "destination accepted no bytes",
                ));
            }
            Ok(n) => {
                *written += n as u64;
                rest = &rest[n..];
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }

    loop {
        match dst.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
}

/// Whether a write error means the downstream reader has gone away.
pub fn is_consumer_closed(err: &io::Error) -> bool {
    err.kind() == ErrorKind::BrokenPipe
        || (cfg!(windows)
            && matches!(err.raw_os_error(), Some(ERROR_BROKEN_PIPE | ERROR_NO_DATA)))
}

/// Whether a read error means every writer of the pipe has closed.
///
/// POSIX pipes report this as a zero-length read; Windows anonymous pipes
/// fail the read with `ERROR_BROKEN_PIPE` instead.
fn is_source_closed(err: &io::Error) -> bool {
    err.kind() == ErrorKind::BrokenPipe
        || (cfg!(windows) && err.raw_os_error() == Some(ERROR_BROKEN_PIPE))
}
