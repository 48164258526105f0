// ABOUTME: Error types for post store operations.
// ABOUTME: Provides StoreError with Read, Parse, Serialize, Write and Persist variants.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading or saving the post store.
///
/// All of them are fatal for a batch run; nothing is written once one occurs.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read.
    #[error("failed to read post store {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file is not a JSON array of post records.
    #[error("invalid post store {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The posts could not be encoded as JSON.
    #[error("failed to encode posts: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The temporary file next to the store could not be created or written.
    #[error("failed to write post store {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temporary file could not be moved over the store.
    #[error("failed to replace post store {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl StoreError {
    pub fn read(path: &Path, source: io::Error) -> Self {
        StoreError::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write(path: &Path, source: io::Error) -> Self {
        StoreError::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the store involved, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreError::Read { path, .. }
            | StoreError::Parse { path, .. }
            | StoreError::Write { path, .. }
            | StoreError::Persist { path, .. } => Some(path),
            StoreError::Serialize(_) => None,
        }
    }

    /// Returns true if this is a Read error.
    pub fn is_read(&self) -> bool {
        matches!(self, StoreError::Read { .. })
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, StoreError::Parse { .. })
    }

    /// Returns true if the error happened while writing the store.
    pub fn is_write(&self) -> bool {
        matches!(self, StoreError::Write { .. } | StoreError::Persist { .. })
    }
}
