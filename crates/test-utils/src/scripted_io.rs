// src/scripted_io.rs

//! Readers and writers that misbehave on purpose.
//!
//! Both replay a cycle of transfer sizes (so a single call moves fewer bytes
//! than asked for), can inject `Interrupted` errors every n-th call, and can
//! end with an error instead of a clean finish.

use std::io::{self, ErrorKind, Read, Write};

/// Cycle through `sizes`; an empty list means "no limit". Zero counts as one
/// so a transfer always makes progress.
fn next_size(sizes: &[usize], idx: &mut usize) -> usize {
    if sizes.is_empty() {
        return usize::MAX;
    }
    let size = sizes[*idx % sizes.len()].max(1);
    *idx += 1;
    size
}

/// Every `n`-th call is interrupted. `n` must be at least 2, otherwise no
/// call would ever succeed.
fn interrupted(every: Option<usize>, calls: usize) -> bool {
    every.is_some_and(|n| calls % n == 0)
}

#[derive(Debug, Clone, Default)]
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    sizes: Vec<usize>,
    size_idx: usize,
    interrupt_every: Option<usize>,
    calls: usize,
    interrupts: usize,
    final_error: Option<ErrorKind>,
}

impl ChunkedReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn chunk_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn interrupt_every(mut self, n: usize) -> Self {
        assert!(n >= 2, "interrupting every call would never make progress");
        self.interrupt_every = Some(n);
        self
    }

    /// Fail with `kind` once the data runs out, instead of returning `Ok(0)`.
    pub fn then_fail(mut self, kind: ErrorKind) -> Self {
        self.final_error = Some(kind);
        self
    }

    pub fn interrupts(&self) -> usize {
        self.interrupts
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if interrupted(self.interrupt_every, self.calls) {
            self.interrupts += 1;
            return Err(ErrorKind::Interrupted.into());
        }

        let remaining = self.data.len() - self.pos;
        if remaining == 0 {
            return match self.final_error.take() {
                Some(kind) => Err(kind.into()),
                None => Ok(0),
            };
        }

        let n = next_size(&self.sizes, &mut self.size_idx)
            .min(buf.len())
            .min(remaining);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChunkedWriter {
    written: Vec<u8>,
    sizes: Vec<usize>,
    size_idx: usize,
    interrupt_every: Option<usize>,
    calls: usize,
    interrupts: usize,
    limit: Option<(usize, ErrorKind)>,
    flushes: usize,
}

impl ChunkedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn interrupt_every(mut self, n: usize) -> Self {
        assert!(n >= 2, "interrupting every call would never make progress");
        self.interrupt_every = Some(n);
        self
    }

    /// Accept exactly `bytes` bytes, then fail every write with `BrokenPipe`,
    /// like a pipe whose reader went away.
    pub fn close_after(self, bytes: usize) -> Self {
        self.fail_after(bytes, ErrorKind::BrokenPipe)
    }

    /// Accept exactly `bytes` bytes, then fail every write with `kind`.
    pub fn fail_after(mut self, bytes: usize, kind: ErrorKind) -> Self {
        self.limit = Some((bytes, kind));
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Number of write calls made, interrupted ones included.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn interrupts(&self) -> usize {
        self.interrupts
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl Write for ChunkedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        if interrupted(self.interrupt_every, self.calls) {
            self.interrupts += 1;
            return Err(ErrorKind::Interrupted.into());
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let mut n = next_size(&self.sizes, &mut self.size_idx).min(buf.len());
        if let Some((limit, kind)) = self.limit {
            let room = limit.saturating_sub(self.written.len());
            if room == 0 {
                return Err(kind.into());
            }
            n = n.min(room);
        }

        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
