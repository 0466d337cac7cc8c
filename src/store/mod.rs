//! Document collections backing the planner.
//!
//! Documents are schemaless JSON objects keyed by `(collection, id)`. Writes
//! merge top-level fields into the existing document and are broadcast to
//! every subscriber of that collection.

pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::errors::AppError;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Channels,
    Videos,
    Prompts,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Channels, Collection::Videos, Collection::Prompts];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Channels => "channels",
            Collection::Videos => "videos",
            Collection::Prompts => "prompts",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Saved { id: String, doc: Value },
    Deleted { id: String },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of the collection, oldest first.
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, AppError>;

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, AppError>;

    /// Upserts `doc`, merging its top-level fields into any existing document.
    /// Returns the stored document.
    async fn save(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, AppError>;

    /// Removing an id that does not exist is not an error.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), AppError>;

    fn subscribe(&self, collection: Collection) -> broadcast::Receiver<StoreEvent>;
}

/// Per-collection broadcast senders shared by the store backends.
#[derive(Debug, Clone)]
pub struct Subscriptions {
    senders: HashMap<Collection, broadcast::Sender<StoreEvent>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        let senders = Collection::ALL
            .iter()
            .map(|c| (*c, broadcast::channel(EVENT_BUFFER).0))
            .collect();
        Self { senders }
    }

    pub fn subscribe(&self, collection: Collection) -> broadcast::Receiver<StoreEvent> {
        self.sender(collection).subscribe()
    }

    pub fn publish(&self, collection: Collection, event: StoreEvent) {
        // No receivers is the normal idle state.
        let _ = self.sender(collection).send(event);
    }

    fn sender(&self, collection: Collection) -> &broadcast::Sender<StoreEvent> {
        &self.senders[&collection]
    }
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Shallow merge: top-level keys of `incoming` overwrite those of `existing`.
/// Non-object values replace the document outright.
pub fn merge_documents(existing: &mut Value, incoming: Value) {
    match incoming {
        Value::Object(fields) if existing.is_object() => {
            if let Some(target) = existing.as_object_mut() {
                target.extend(fields);
            }
        }
        other => *existing = other,
    }
}

/// Decodes every document of `collection`, skipping the ones that do not fit `T`.
pub async fn load_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
) -> Result<Vec<T>, AppError> {
    let docs = store.list(collection).await?;
    let total = docs.len();

    let decoded: Vec<T> = docs
        .into_iter()
        .filter_map(|doc| match serde_json::from_value::<T>(doc) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(
                    collection = collection.name(),
                    error = %e,
                    "Skipping malformed document"
                );
                None
            }
        })
        .collect();

    tracing::debug!(
        collection = collection.name(),
        total,
        decoded = decoded.len(),
        "Loaded collection"
    );

    Ok(decoded)
}

/// Decodes one document. A document that does not fit `T` is treated as
/// absent, the same way [`load_all`] skips it.
pub async fn load_one<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, AppError> {
    let Some(doc) = store.get(collection, id).await? else {
        return Ok(None);
    };

    match serde_json::from_value::<T>(doc) {
        Ok(item) => Ok(Some(item)),
        Err(e) => {
            tracing::warn!(
                collection = collection.name(),
                id,
                error = %e,
                "Ignoring malformed document"
            );
            Ok(None)
        }
    }
}

pub async fn save_typed<T: Serialize + DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
    item: &T,
) -> Result<T, AppError> {
    let stored = store.save(collection, id, serde_json::to_value(item)?).await?;
    Ok(serde_json::from_value(stored)?)
}
