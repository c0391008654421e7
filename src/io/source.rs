use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;

use crate::error::IoError;

/// Default number of leading bytes read from each file (64 KiB).
///
/// JPEG places its header segments, including APP1/Exif, before the
/// compressed scan data, so a bounded prefix is enough.
pub const DEFAULT_PREFIX_BYTES: usize = 64 * 1024;

/// Trait for reading a bounded prefix of a resource.
///
/// The parser itself never does I/O; implementations of this trait are how
/// callers obtain the buffer they hand to it.
#[async_trait]
pub trait PrefixSource: Send + Sync {
    /// Read up to `max_len` bytes from the start of the resource.
    ///
    /// Returns fewer bytes if the resource is shorter.
    async fn read_prefix(&self, max_len: usize) -> Result<Bytes, IoError>;

    /// Get a unique identifier for this resource (for logging and reports).
    fn identifier(&self) -> &str;
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    identifier: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identifier = path.display().to_string();
        Self { path, identifier }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PrefixSource for FileSource {
    async fn read_prefix(&self, max_len: usize) -> Result<Bytes, IoError> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| map_io_error(&self.identifier, e))?;

        let mut buf = BytesMut::with_capacity(max_len.min(DEFAULT_PREFIX_BYTES));
        // `take` bounds the read so large files never load past the prefix
        let mut limited = file.take(max_len as u64);
        loop {
            if buf.len() == buf.capacity() {
                buf.reserve(8 * 1024);
            }
            let n = limited
                .read_buf(&mut buf)
                .await
                .map_err(|e| map_io_error(&self.identifier, e))?;
            if n == 0 {
                break;
            }
        }

        Ok(buf.freeze())
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// An in-memory resource, useful for tests and for callers that already
/// hold the file contents.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
    identifier: String,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>, identifier: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            identifier: identifier.into(),
        }
    }
}

#[async_trait]
impl PrefixSource for MemorySource {
    async fn read_prefix(&self, max_len: usize) -> Result<Bytes, IoError> {
        let end = self.data.len().min(max_len);
        Ok(self.data.slice(..end))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

fn map_io_error(identifier: &str, err: std::io::Error) -> IoError {
    match err.kind() {
        std::io::ErrorKind::NotFound => IoError::NotFound(identifier.to_string()),
        _ => IoError::Read {
            path: identifier.to_string(),
            message: err.to_string(),
        },
    }
}
