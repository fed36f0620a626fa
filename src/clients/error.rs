//! Error types for the backend-facing clients.

use crate::backend::BackendError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Form data that cannot be stored, e.g. a blank name.
    #[error("Invalid catalog entry: {0}")]
    Invalid(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
