use crate::backend::BackendError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A document body: a JSON object.
pub type Document = Map<String, Value>;

/// A document together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub data: Document,
}

impl Snapshot {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        decode(&self.data)
    }
}

pub fn decode<T: DeserializeOwned>(doc: &Document) -> Result<T, BackendError> {
    Ok(T::deserialize(Value::Object(doc.clone()))?)
}

/// Serializes `value` into a document. Non-object values are rejected.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Document, BackendError> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        other => Err(BackendError::InvalidDocument(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Collections of JSON documents keyed by string ids.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, BackendError>;

    /// Every document of `collection`, in the backend's order.
    async fn list(&self, collection: &str) -> Result<Vec<Snapshot>, BackendError>;

    /// Documents whose top-level `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Snapshot>, BackendError>;

    /// Stores a new document under a generated id and returns the id.
    async fn create(&self, collection: &str, doc: Document) -> Result<String, BackendError>;

    /// Creates or replaces the document at `id`.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), BackendError>;

    /// Overwrites only the given fields. Fails with `NotFound` if the
    /// document does not exist.
    async fn merge(&self, collection: &str, id: &str, fields: Document)
        -> Result<(), BackendError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError>;
}
