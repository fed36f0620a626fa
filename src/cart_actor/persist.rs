//! Reading and writing the two copies of a cart.
//!
//! The local copy is written synchronously and is always current. The remote
//! copy is written from a detached task: the session never waits for it, a
//! failure is logged and dropped, and two writes in flight may land in either
//! order. The version stored next to both copies makes such drift visible on
//! the next load.

use crate::backend::{decode, encode, BackendError, DocumentStore};
use crate::model::{Cart, UserId};
use crate::storage::{get_json, keys, set_json, LocalStore, StorageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Collection holding one cart document per user.
pub const CARTS: &str = "carts";

/// Body of `carts/<uid>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteCart {
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub version: u64,
}

/// What local storage holds under one cart key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalCart {
    pub cart: Cart,
    /// `None` when the cart was written by something that does not track
    /// versions, or never written at all.
    pub version: Option<u64>,
}

pub fn write_local(
    local: &dyn LocalStore,
    key: &str,
    cart: &Cart,
    version: u64,
) -> Result<(), StorageError> {
    set_json(local, key, cart)?;
    local.set_item(&keys::version_key(key), &version.to_string())
}

pub fn read_local(local: &dyn LocalStore, key: &str) -> Result<LocalCart, StorageError> {
    let cart = get_json::<Cart>(local, key)?.unwrap_or_default();
    let version = local
        .get_item(&keys::version_key(key))?
        .and_then(|raw| raw.trim().parse().ok());
    Ok(LocalCart { cart, version })
}

/// Removes the cart and its version.
pub fn clear_local(local: &dyn LocalStore, key: &str) -> Result<(), StorageError> {
    local.remove_item(key)?;
    local.remove_item(&keys::version_key(key))
}

pub async fn read_remote(
    remote: &dyn DocumentStore,
    user: &UserId,
) -> Result<Option<RemoteCart>, BackendError> {
    match remote.get(CARTS, user.as_str()).await? {
        Some(doc) => Ok(Some(decode(&doc)?)),
        None => Ok(None),
    }
}

/// Upserts `carts/<uid>` in the background.
///
/// The handle is only useful to tests; callers normally drop it.
pub fn spawn_remote_write(
    remote: Arc<dyn DocumentStore>,
    user: UserId,
    body: RemoteCart,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let version = body.version;
        let result = match encode(&body) {
            Ok(doc) => remote.set(CARTS, user.as_str(), doc).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => debug!(%user, version, "Remote cart written"),
            Err(e) => warn!(%user, version, error = %e, "Remote cart write failed"),
        }
    })
}
