use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::broadcast;

use super::{Collection, DocumentStore, StoreEvent, Subscriptions};
use crate::errors::AppError;

/// Documents live in a single `documents` table with a `jsonb` payload.
///
/// Merging on write is done by Postgres (`jsonb || jsonb`), so concurrent
/// writers resolve last-write-wins per top-level field.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    subscriptions: Subscriptions,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            subscriptions: Subscriptions::new(),
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(name = "List documents", skip(self))]
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, AppError> {
        let docs = sqlx::query_scalar::<_, Json<Value>>(
            r#"
            SELECT data FROM documents
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(collection.name())
        .fetch_all(&self.pool)
        .await?;

        Ok(docs.into_iter().map(|Json(doc)| doc).collect())
    }

    #[tracing::instrument(name = "Get document", skip(self))]
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, AppError> {
        let doc = sqlx::query_scalar::<_, Json<Value>>(
            r#"SELECT data FROM documents WHERE collection = $1 AND id = $2"#,
        )
        .bind(collection.name())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc.map(|Json(doc)| doc))
    }

    #[tracing::instrument(name = "Save document", skip(self, doc))]
    async fn save(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, AppError> {
        let Json(stored) = sqlx::query_scalar::<_, Json<Value>>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE
                SET data = documents.data || EXCLUDED.data,
                    updated_at = now()
            RETURNING data
            "#,
        )
        .bind(collection.name())
        .bind(id)
        .bind(Json(&doc))
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Saved {}/{}", collection.name(), id);

        self.subscriptions.publish(
            collection,
            StoreEvent::Saved {
                id: id.to_string(),
                doc: stored.clone(),
            },
        );

        Ok(stored)
    }

    #[tracing::instrument(name = "Delete document", skip(self))]
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM documents WHERE collection = $1 AND id = $2"#)
            .bind(collection.name())
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Deleted {}/{}: {} rows affected",
            collection.name(),
            id,
            result.rows_affected()
        );

        if result.rows_affected() > 0 {
            self.subscriptions
                .publish(collection, StoreEvent::Deleted { id: id.to_string() });
        }

        Ok(())
    }

    fn subscribe(&self, collection: Collection) -> broadcast::Receiver<StoreEvent> {
        self.subscriptions.subscribe(collection)
    }
}
