use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found")]
    NotFound,

    #[error("Duplicate value for unique field '{0}'")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// One named collection of JSON documents keyed by id.
///
/// Every mutating operation runs inside a single write-lock critical
/// section, which is the per-document atomicity contract the rest of the
/// system builds on: a conditional update passed to [`Collection::update`]
/// observes and mutates the document in one atomic step.
pub struct Collection {
    name: &'static str,
    docs: RwLock<HashMap<Uuid, Value>>,
}

impl Collection {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            docs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, id: Uuid, doc: Value) {
        debug!("Inserting document {} into {}", id, self.name);
        self.docs.write().await.insert(id, doc);
    }

    /// Insert, failing if any existing document carries the same string
    /// value for `unique_field`. Check and insert share one lock.
    pub async fn insert_unique(
        &self,
        id: Uuid,
        doc: Value,
        unique_field: &str,
    ) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;

        let candidate = doc.get(unique_field).cloned();
        if candidate.is_some()
            && docs
                .values()
                .any(|existing| existing.get(unique_field) == candidate.as_ref())
        {
            return Err(StoreError::Duplicate(unique_field.to_string()));
        }

        debug!("Inserting document {} into {}", id, self.name);
        docs.insert(id, doc);
        Ok(())
    }

    pub async fn find(&self, id: Uuid) -> Option<Value> {
        self.docs.read().await.get(&id).cloned()
    }

    /// First document whose `field` equals the given string value.
    pub async fn find_by_field(&self, field: &str, value: &str) -> Option<Value> {
        self.docs
            .read()
            .await
            .values()
            .find(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
            .cloned()
    }

    pub async fn find_all(&self) -> Vec<Value> {
        self.docs.read().await.values().cloned().collect()
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<Value>
    where
        P: Fn(&Value) -> bool,
    {
        self.docs
            .read()
            .await
            .values()
            .filter(|doc| predicate(doc))
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Conditional update: `apply` runs against the live document under the
    /// collection write lock and may refuse the update by returning an
    /// error, in which case the document is left untouched. Returns the
    /// updated document.
    pub async fn update<F>(&self, id: Uuid, apply: F) -> Result<Value, StoreError>
    where
        F: FnOnce(&mut Value) -> Result<(), StoreError>,
    {
        let mut docs = self.docs.write().await;
        let doc = docs.get_mut(&id).ok_or(StoreError::NotFound)?;

        let mut staged = doc.clone();
        apply(&mut staged)?;
        *doc = staged.clone();

        debug!("Updated document {} in {}", id, self.name);
        Ok(staged)
    }
}

/// The document database: one collection per persisted entity.
pub struct DocumentStore {
    pub users: Collection,
    pub doctors: Collection,
    pub appointments: Collection,
    pub admins: Collection,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            users: Collection::new("users"),
            doctors: Collection::new("doctors"),
            appointments: Collection::new("appointments"),
            admins: Collection::new("admins"),
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
