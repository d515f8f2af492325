//! Error types for tag document file I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or saving a tag document.
///
/// Parsing itself never fails with an error: a missing tag reads as the end
/// of the document and a missing attribute reads as the caller's default.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening, reading, or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8. It is refused rather than decoded
    /// lossily, since saving it again would rewrite the invalid bytes.
    #[error("{}: not valid UTF-8 (first invalid byte at offset {offset})", .path.display())]
    Encoding { path: PathBuf, offset: usize },

    /// Writing to a stream failed.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),
}

/// Result type for tag document operations.
pub type Result<T> = std::result::Result<T, Error>;
