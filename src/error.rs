//! Error types for the tikzcircuit extractor.
//!
//! This module provides a unified error type [`TikzError`] covering the
//! scanning, document-extraction and I/O failure modes. The DSL core itself
//! is deliberately permissive (see the `dsl` module docs): malformed
//! fragments are dropped, not surfaced as errors.

use thiserror::Error;

/// Result type alias using [`TikzError`].
pub type Result<T> = std::result::Result<T, TikzError>;

/// Unified error type for all tikzcircuit operations.
#[derive(Error, Debug)]
pub enum TikzError {
    // ============ Scanning Errors ============
    /// A delimiter scan ran off the end of the input without the nesting
    /// depth returning to zero.
    #[error("Unterminated '{open}' delimiter starting at byte {start}")]
    UnterminatedDelimiter { open: char, start: usize },

    // ============ Document Errors ============
    /// No circuitikz/tikzpicture block was found in the document.
    #[error("No \\begin{{circuitikz}} or \\begin{{tikzpicture}} block found")]
    NoDrawingBlock,

    // ============ I/O Errors ============
    /// Error reading an input document.
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing an output file.
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error serializing the element list.
    #[error("Failed to serialize element list: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl TikzError {
    /// Create an unterminated-delimiter error.
    pub fn unterminated(open: char, start: usize) -> Self {
        Self::UnterminatedDelimiter { open, start }
    }

    /// Create a file-read error.
    pub fn file_read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a file-write error.
    pub fn file_write(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}
