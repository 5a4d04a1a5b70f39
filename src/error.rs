//! Error kinds raised while aggregating a tree

use std::io;
use std::path::PathBuf;

/// Errors produced by classification, encoding and traversal
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root path does not exist or cannot be reached
    #[error("Root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A single file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Content classified as text is not valid UTF-8
    #[error("File {} is not valid UTF-8 but was classified as text", path.display())]
    TextDecode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Writing the archive stream failed
    #[error("Failed to write archive output: {0}")]
    Output(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
