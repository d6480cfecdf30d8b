//! Guarded stream reading.
//!
//! Streams are read forward-only in fixed chunks. Before every chunk the
//! deadline and cancel flag are checked, and the running total is compared
//! against the byte limit, so an unbounded or stalled stream cannot hold a
//! worker past its budget by more than one read.

use crate::{BlobtextError, Result, SizeUnit};
use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Size of each read from the input stream.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Shared flag used to abort in-flight extractions.
///
/// Clones observe the same flag. Raising it makes the next read or parser
/// checkpoint fail with [`BlobtextError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Lower the flag so later extractions run again.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Wall-clock budget of one extraction pass.
#[derive(Debug, Clone)]
pub struct Deadline {
    started: Instant,
    timeout: Option<Duration>,
    cancel: Option<CancellationFlag>,
}

impl Deadline {
    pub fn start(timeout: Option<Duration>, cancel: Option<CancellationFlag>) -> Self {
        Self {
            started: Instant::now(),
            timeout,
            cancel,
        }
    }

    /// A deadline that never fires.
    pub fn unlimited() -> Self {
        Self::start(None, None)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fail if the pass was cancelled or has run out of time.
    pub fn check(&self) -> Result<()> {
        if let Some(cancel) = &self.cancel
            && cancel.is_cancelled()
        {
            return Err(BlobtextError::Cancelled);
        }

        if let Some(timeout) = self.timeout
            && self.started.elapsed() >= timeout
        {
            return Err(BlobtextError::TimedOut(timeout));
        }

        Ok(())
    }
}

/// Read `stream` to its end under the given limits.
///
/// The stream is consumed and dropped before returning, whatever the outcome.
///
/// # Errors
///
/// - `BlobtextError::Io` if a read fails (interrupted reads are retried)
/// - `BlobtextError::ContentTooLarge` with a bytes unit if more than
///   `max_bytes` bytes are available
/// - `BlobtextError::TimedOut` / `BlobtextError::Cancelled` from the deadline
pub fn read_stream(mut stream: Box<dyn Read + Send>, max_bytes: Option<u64>, deadline: &Deadline) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];

    loop {
        deadline.check()?;

        let n = match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(BlobtextError::Io(e)),
        };

        if let Some(limit) = max_bytes
            && (data.len() + n) as u64 > limit
        {
            return Err(BlobtextError::ContentTooLarge {
                limit,
                unit: SizeUnit::Bytes,
            });
        }

        data.extend_from_slice(&chunk[..n]);
    }

    Ok(data)
}

/// Read a decompressed member (archive entry, package part) to its end.
///
/// Reading stops one byte past `max_bytes`, so a decompression bomb never
/// inflates further than the limit.
///
/// # Errors
///
/// `BlobtextError::ContentTooLarge` with a bytes unit past the limit, and
/// `BlobtextError::Parsing` when the member cannot be decompressed.
pub fn read_member(member: &mut dyn Read, name: &str, max_bytes: Option<u64>) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let read = match max_bytes {
        Some(limit) => member.take(limit.saturating_add(1)).read_to_end(&mut data),
        None => member.read_to_end(&mut data),
    };
    read.map_err(|e| BlobtextError::parsing_with_source(format!("Failed to decompress '{}'", name), e))?;

    if let Some(limit) = max_bytes
        && data.len() as u64 > limit
    {
        return Err(BlobtextError::ContentTooLarge {
            limit,
            unit: SizeUnit::Bytes,
        });
    }

    Ok(data)
}
