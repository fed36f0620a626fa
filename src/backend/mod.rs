//! The hosted services behind the storefront: documents, blobs and auth.
//!
//! Everything above this module talks to the traits only. [`MemoryBackend`]
//! implements all three in process memory.

mod auth;
mod blob;
mod document;
mod error;
mod memory;

pub use auth::AuthProvider;
pub use blob::{no_progress, BlobStore};
pub use document::{decode, encode, Document, DocumentStore, Snapshot};
pub use error::BackendError;
pub use memory::{MemoryBackend, UPLOAD_CHUNK};

use std::sync::Arc;

/// Handles to the three backend services, shared by every client.
#[derive(Clone)]
pub struct Backend {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub auth: Arc<dyn AuthProvider>,
}

impl Backend {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            documents,
            blobs,
            auth,
        }
    }

    /// Uses `memory` for all three services.
    pub fn memory(memory: &Arc<MemoryBackend>) -> Self {
        Self {
            documents: memory.clone(),
            blobs: memory.clone(),
            auth: memory.clone(),
        }
    }
}
