//! Error types for the snippet store and the import/export codec.

use thiserror::Error;

/// Failures of the snippet store and its persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be read or written (missing directory,
    /// permissions, disk full).
    #[error("storage backend error: {0}")]
    Backend(#[from] std::io::Error),

    /// The persisted blob exists but is not a valid snippet collection.
    #[error("stored collection is corrupted: {0}")]
    Corrupted(#[source] serde_json::Error),

    #[error("failed to serialize collection: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Failures that reject an import document as a whole.
///
/// Individual invalid records never produce an error; they are counted
/// in the import report and skipped.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Read(#[from] std::io::Error),

    #[error("import file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid file format: expected a list of snippets")]
    NotAnArray,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
