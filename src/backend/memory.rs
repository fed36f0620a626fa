use crate::backend::{AuthProvider, BackendError, BlobStore, Document, DocumentStore, Snapshot};
use crate::model::{AuthUser, UserId};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// Size of one reported upload step.
pub const UPLOAD_CHUNK: usize = 64 * 1024;

#[derive(Debug)]
struct Account {
    uid: UserId,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    /// Documents per collection, in insertion order.
    collections: HashMap<String, Vec<Snapshot>>,
    blobs: HashMap<String, Vec<u8>>,
    accounts: HashMap<String, Account>,
}

/// All three backend services held in process memory.
///
/// Used by the demo binary and by tests. [`MemoryBackend::set_offline`] makes
/// every fallible call fail with [`BackendError::Unavailable`].
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<State>,
    offline: AtomicBool,
    auth: watch::Sender<Option<AuthUser>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (auth, _) = watch::channel(None);
        Self {
            state: Mutex::new(State::default()),
            offline: AtomicBool::new(false),
            auth,
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Bytes stored at `path`, if anything was uploaded there.
    pub fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.state().blobs.get(path).cloned()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("backend is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, BackendError> {
        self.online()?;
        let state = self.state();
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .map(|doc| doc.data.clone()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Snapshot>, BackendError> {
        self.online()?;
        Ok(self
            .state()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Snapshot>, BackendError> {
        self.online()?;
        let state = self.state();
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.data.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(&self, collection: &str, doc: Document) -> Result<String, BackendError> {
        self.online()?;
        let id = new_id();
        self.state()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Snapshot {
                id: id.clone(),
                data: doc,
            });
        debug!(collection, %id, "Document created");
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), BackendError> {
        self.online()?;
        let mut state = self.state();
        let docs = state.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => existing.data = doc,
            None => docs.push(Snapshot {
                id: id.to_string(),
                data: doc,
            }),
        }
        Ok(())
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), BackendError> {
        self.online()?;
        let mut state = self.state();
        let existing = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| BackendError::NotFound(format!("{collection}/{id}")))?;
        existing.data.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        self.online()?;
        if let Some(docs) = self.state().collections.get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBackend {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        on_progress: &(dyn Fn(f64) + Send + Sync),
    ) -> Result<String, BackendError> {
        self.online()?;
        let total = bytes.len();
        if total == 0 {
            on_progress(100.0);
        }
        let mut sent = 0;
        for chunk in bytes.chunks(UPLOAD_CHUNK) {
            sent += chunk.len();
            on_progress(sent as f64 / total as f64 * 100.0);
            tokio::task::yield_now().await;
        }
        self.state().blobs.insert(path.to_string(), bytes);
        debug!(path, bytes = total, "Blob uploaded");
        Ok(format!("memory://{path}"))
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        self.online()?;
        let email = email.trim().to_lowercase();
        let user = {
            let mut state = self.state();
            if state.accounts.contains_key(&email) {
                return Err(BackendError::Auth(format!("{email} is already registered")));
            }
            let uid = UserId::from(new_id());
            state.accounts.insert(
                email.clone(),
                Account {
                    uid: uid.clone(),
                    password: password.to_string(),
                },
            );
            AuthUser { uid, email }
        };
        self.auth.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        self.online()?;
        let email = email.trim().to_lowercase();
        let user = {
            let state = self.state();
            match state.accounts.get(&email) {
                Some(account) if account.password == password => AuthUser {
                    uid: account.uid.clone(),
                    email,
                },
                _ => return Err(BackendError::Auth("invalid email or password".to_string())),
            }
        };
        self.auth.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.online()?;
        self.auth.send_replace(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.auth.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.auth.subscribe()
    }
}
