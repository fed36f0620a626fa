//! Local device storage, shaped like the browser's `localStorage`.
//!
//! Calls are synchronous: a cart write has landed on the device by the time
//! the action that caused it returns.

mod error;
mod file;
pub mod keys;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// String key/value storage local to one device.
pub trait LocalStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads `key` as JSON. A missing key is `Ok(None)`.
pub fn get_json<V: DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
) -> Result<Option<V>, StorageError> {
    match store.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn set_json<V: Serialize + ?Sized>(
    store: &dyn LocalStore,
    key: &str,
    value: &V,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw)
}
