//! Error types for the container crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognized container header: {0:02x?}")]
    InvalidMagic([u8; 4]),

    #[error("container truncated: {field} needs {needed} bytes at offset {offset}, {available} left")]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid length prefix {length} for {field}")]
    InvalidLength { field: &'static str, length: i32 },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("{field} is too long for a 32-bit length prefix: {len} bytes")]
    TooLong { field: &'static str, len: usize },
}

/// Result type for container operations.
pub type PackResult<T> = Result<T, PackError>;
