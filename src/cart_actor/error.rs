//! Error types for the cart actor.

use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// Items are added at least one unit at a time.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Lists the blank customer fields.
    #[error("Missing customer details: {0}")]
    InvalidCustomer(String),

    /// The order could not be stored; the cart was left as it was.
    #[error("Checkout failed: {0}")]
    Checkout(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The actor answered with a result of the wrong kind.
    #[error("Unexpected action result: {0}")]
    UnexpectedResult(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CartError {
    fn from(msg: String) -> Self {
        CartError::ActorCommunicationError(msg)
    }
}
