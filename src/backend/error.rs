//! Error types for the hosted backend.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    /// Rejected credentials, duplicate accounts, missing session.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A document did not have the expected shape.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::InvalidDocument(e.to_string())
    }
}
