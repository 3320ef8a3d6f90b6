use std::path::PathBuf;

use thiserror::Error;

/// Failures of the snapshot store.
///
/// Everything here is fatal for the monitor loop that owns the store;
/// recoverable fetch failures never reach this type. `Corrupt` can only
/// occur at `open`, `Unavailable` only at `reconcile`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The directory holds content the store cannot claim as its own:
    /// records without a marker, or a record file whose content disagrees
    /// with its file name. Never adopted or wiped silently.
    #[error("snapshot directory {path}: {detail}")]
    Corrupt { path: PathBuf, detail: String },

    /// The marker file vanished after `open`, meaning an external actor
    /// touched the directory. The durable guarantee is already broken, so
    /// the owning loop must stop rather than keep writing.
    #[error("snapshot marker missing from {path}; directory was modified externally")]
    Unavailable { path: PathBuf },

    /// A persisted record no longer matches the expected schema.
    #[error("record '{id}' does not match the expected schema: {source}")]
    BadRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized for persistence.
    #[error("failed to encode record '{id}': {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record id that cannot be used as a file name.
    #[error("record id '{id}' is not usable as a file name: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
