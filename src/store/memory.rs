use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use super::{merge_documents, Collection, DocumentStore, StoreEvent, Subscriptions};
use crate::errors::AppError;

#[derive(Debug)]
struct Entry {
    seq: u64,
    doc: Value,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    docs: HashMap<(Collection, String), Entry>,
}

/// Process-local store. Used by tests and by `STORE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
    subscriptions: Subscriptions,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, AppError> {
        let inner = self.inner.read().await;

        let mut entries: Vec<&Entry> = inner
            .docs
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|(_, entry)| entry)
            .collect();
        entries.sort_by_key(|e| e.seq);

        Ok(entries.into_iter().map(|e| e.doc.clone()).collect())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .docs
            .get(&(collection, id.to_string()))
            .map(|e| e.doc.clone()))
    }

    async fn save(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, AppError> {
        let stored = {
            let mut inner = self.inner.write().await;
            let seq = inner.next_seq;
            inner.next_seq += 1;

            let entry = inner
                .docs
                .entry((collection, id.to_string()))
                .or_insert_with(|| Entry {
                    seq,
                    doc: Value::Object(Default::default()),
                });
            merge_documents(&mut entry.doc, doc);
            entry.doc.clone()
        };

        self.subscriptions.publish(
            collection,
            StoreEvent::Saved {
                id: id.to_string(),
                doc: stored.clone(),
            },
        );

        Ok(stored)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), AppError> {
        let removed = {
            let mut inner = self.inner.write().await;
            inner.docs.remove(&(collection, id.to_string())).is_some()
        };

        if removed {
            self.subscriptions
                .publish(collection, StoreEvent::Deleted { id: id.to_string() });
        }

        Ok(())
    }

    fn subscribe(&self, collection: Collection) -> broadcast::Receiver<StoreEvent> {
        self.subscriptions.subscribe(collection)
    }
}
