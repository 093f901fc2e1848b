//! Custom error types for Memory-Inspector

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for inspector operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Bad address provided: {0}")]
    BadAddress(String),

    #[error("Bad offset provided: {0}")]
    BadOffset(String),

    #[error("Bad value provided: {0}")]
    BadValue(String),

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Write of {len} bytes at 0x{address:08X} leaves the region")]
    OutOfRange { address: u32, len: usize },

    #[error("Address space not available: {0}")]
    UnknownAddressSpace(String),
}

/// Result type alias for inspector operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates an I/O error tagged with the offending file
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        MemoryError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a bad value error
    pub fn bad_value(reason: impl Into<String>) -> Self {
        MemoryError::BadValue(reason.into())
    }

    /// Short, stable label for the error family
    pub fn category(&self) -> &'static str {
        match self {
            MemoryError::BadAddress(_) => "bad address",
            MemoryError::BadOffset(_) => "bad offset",
            MemoryError::BadValue(_) => "bad value",
            MemoryError::Io { .. } => "io failure",
            MemoryError::OutOfRange { .. } => "out of range",
            MemoryError::UnknownAddressSpace(_) => "unknown address space",
        }
    }
}
