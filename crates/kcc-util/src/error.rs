//! Error types for kcc-util's own fallible operations.
//!
//! Diagnostics (see [`crate::diagnostic`]) are how the front-end reports
//! problems with the *program being compiled*; the errors here are for
//! problems with the compiler's own bookkeeping (an out-of-bounds index, a
//! source file that can't be read back for a snippet) and are propagated
//! with `?`, never surfaced to the end user directly.

use thiserror::Error;

/// Error type for index vector operations.
#[derive(Debug, Error)]
pub enum IndexVecError {
    #[error("index out of bounds: index {index}, length {length}")]
    OutOfBounds { index: usize, length: usize },

    #[error("invalid index: {0}")]
    InvalidIndex(String),
}

/// Error type for fetching source text back for diagnostic rendering.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("invalid line number: {line} (file has {max_lines} lines)")]
    InvalidLineNumber { line: u32, max_lines: u32 },
}

pub type UtilResult<T> = std::result::Result<T, IndexVecError>;
pub type SourceResult<T> = std::result::Result<T, SourceError>;
