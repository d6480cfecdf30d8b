//! Byte-stream references.
//!
//! A [`FileRef`] is a capability to open binary content, not the content
//! itself. The processor opens it once per extraction attempt and drops the
//! returned reader on every exit path.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Provider of a forward-only byte stream.
///
/// Implementations must be cheap to share across threads; opening may block.
pub trait FileRef: Send + Sync + fmt::Debug {
    /// Open a fresh stream over the referenced content.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the reference is invalid or unreachable.
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Total size in bytes, if known without reading.
    fn size_hint(&self) -> Option<u64> {
        None
    }
}

/// Reference to a file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileRef {
    path: PathBuf,
}

impl LocalFileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileRef for LocalFileRef {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn size_hint(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }
}

/// Reference to content already held in memory.
#[derive(Clone)]
pub struct BytesFileRef {
    bytes: Arc<[u8]>,
}

impl BytesFileRef {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { bytes: bytes.into() }
    }
}

impl fmt::Debug for BytesFileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesFileRef").field("len", &self.bytes.len()).finish()
    }
}

impl FileRef for BytesFileRef {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.bytes))))
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }
}
