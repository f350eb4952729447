//! Error types shared across the pipeline.
//!
//! Lifecycle transition failures are kept as plain strings where they
//! cross into batch reports so outcomes stay cloneable and serializable.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::lifecycle::record::RecordState;

/// Errors from the PDF text extraction boundary.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no text layer in {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// The extraction library panicked mid-parse. Seen in the wild on
    /// PDFs with malformed font tables.
    #[error("text extraction panicked on {path}")]
    Panicked { path: PathBuf },
}

/// Errors from lifecycle transitions (rename, move).
///
/// Filesystem failures carry the OS message as a string so the error
/// stays `Clone` and can sit inside batch outcome lists.
#[derive(Debug, Clone, Error)]
pub enum StateError {
    #[error("no record with id {0}")]
    RecordNotFound(uuid::Uuid),

    #[error("transition requires state {expected:?}, record is {actual:?}")]
    Precondition {
        expected: RecordState,
        actual: RecordState,
    },

    #[error("proposed name contains a path separator: {name:?}")]
    InvalidProposedName { name: String },

    #[error("destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("{op} failed for {path}: {message}")]
    Io {
        op: &'static str,
        path: PathBuf,
        message: String,
    },
}

/// Errors from loading or persisting the customer registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read customer registry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write customer registry {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from loading or persisting settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from starting the folder watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create file watcher: {0}")]
    Init(#[source] notify::Error),

    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}
