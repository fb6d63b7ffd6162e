//! Error types for the document store

use thiserror::Error;

/// Errors that can occur when working with a document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A collection or document path is malformed
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The document targeted by an update does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A value could not be converted to or from the stored representation
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing service rejected the request
    #[error("Store backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The backing service could not be reached
    #[error("Store connection error: {0}")]
    Connection(String),

    /// Other errors
    #[error("Other store error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
