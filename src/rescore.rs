//! Keeps cached video scores in step with their channel.
//!
//! Without this listener a channel edit leaves the scores of its existing
//! videos untouched until each video is saved again.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::domain::{Channel, VideoProject};
use crate::errors::AppError;
use crate::priority::assign_priority;
use crate::store::{load_all, Collection, DocumentStore, StoreEvent};

/// Re-stamps the persisted score of every video owned by `channel`.
/// Only `priorityScore` is written, so edits racing the rescore survive the merge.
/// Returns how many videos changed.
#[tracing::instrument(name = "Rescore channel videos", skip(store, channel), fields(channel_id = %channel.id))]
pub async fn rescore_channel_videos(
    store: &dyn DocumentStore,
    channel: &Channel,
) -> Result<usize, AppError> {
    let videos: Vec<VideoProject> = load_all(store, Collection::Videos).await?;
    let mut changed = 0;

    for video in videos.into_iter().filter(|v| v.channel_id == channel.id) {
        let previous = video.priority_score;
        let rescored = assign_priority(video, Some(channel));
        if rescored.priority_score == previous {
            continue;
        }

        store
            .save(
                Collection::Videos,
                &rescored.id,
                json!({ "priorityScore": rescored.priority_score }),
            )
            .await?;
        changed += 1;
    }

    tracing::info!("Rescored {} videos", changed);
    Ok(changed)
}

pub fn spawn_rescore_listener(store: Arc<dyn DocumentStore>) -> JoinHandle<()> {
    let mut events = store.subscribe(Collection::Channels);

    tokio::spawn(async move {
        tracing::info!("Rescore listener started");

        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Rescore listener lagged, {} channel events skipped", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let StoreEvent::Saved { id, doc } = event else {
                continue;
            };

            let channel: Channel = match serde_json::from_value(doc) {
                Ok(channel) => channel,
                Err(e) => {
                    tracing::warn!(channel_id = %id, error = %e, "Ignoring undecodable channel");
                    continue;
                }
            };

            if let Err(e) = rescore_channel_videos(store.as_ref(), &channel).await {
                tracing::error!(channel_id = %id, error = %e, "Failed to rescore videos");
            }
        }

        tracing::info!("Rescore listener stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use tokio::sync::broadcast;

    use crate::store::{load_one, save_typed, MemoryDocumentStore};

    /// Saves a user edit to `v1` right after the video listing is read.
    struct EditAfterList {
        inner: MemoryDocumentStore,
    }

    #[async_trait]
    impl DocumentStore for EditAfterList {
        async fn list(&self, collection: Collection) -> Result<Vec<Value>, AppError> {
            let docs = self.inner.list(collection).await?;
            if collection == Collection::Videos {
                self.inner
                    .save(
                        Collection::Videos,
                        "v1",
                        json!({"title": "Edited by user", "status": "Editing"}),
                    )
                    .await?;
            }
            Ok(docs)
        }

        async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, AppError> {
            self.inner.get(collection, id).await
        }

        async fn save(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, AppError> {
            self.inner.save(collection, id, doc).await
        }

        async fn delete(&self, collection: Collection, id: &str) -> Result<(), AppError> {
            self.inner.delete(collection, id).await
        }

        fn subscribe(&self, collection: Collection) -> broadcast::Receiver<StoreEvent> {
            self.inner.subscribe(collection)
        }
    }

    fn channel(id: &str, g: i32) -> Channel {
        Channel {
            id: id.into(),
            name: id.into(),
            growth_potential: Some(g),
            production_ease: Some(2),
            ..Default::default()
        }
    }

    fn video(id: &str, channel_id: &str, score: f64) -> VideoProject {
        VideoProject {
            id: id.into(),
            channel_id: channel_id.into(),
            title: id.into(),
            priority_score: Some(score),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn only_the_channels_videos_are_rescored() {
        let store = MemoryDocumentStore::new();
        for v in [video("a", "c1", 4.0), video("b", "c1", 10.0), video("c", "c2", 1.0)] {
            save_typed(&store, Collection::Videos, &v.id.clone(), &v).await.unwrap();
        }

        let changed = rescore_channel_videos(&store, &channel("c1", 5)).await.unwrap();
        assert_eq!(changed, 1);

        let videos: Vec<VideoProject> = load_all(&store, Collection::Videos).await.unwrap();
        let scores: Vec<(String, Option<f64>)> = videos
            .into_iter()
            .map(|v| (v.id, v.priority_score))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("a".to_string(), Some(10.0)),
                ("b".to_string(), Some(10.0)),
                ("c".to_string(), Some(1.0)),
            ]
        );
    }

    #[tokio::test]
    async fn rescore_keeps_edits_made_while_it_runs() {
        let store = EditAfterList {
            inner: MemoryDocumentStore::new(),
        };
        let v = VideoProject {
            title: "Original".into(),
            ..video("v1", "c1", 4.0)
        };
        save_typed(&store, Collection::Videos, "v1", &v).await.unwrap();

        let changed = rescore_channel_videos(&store, &channel("c1", 3)).await.unwrap();
        assert_eq!(changed, 1);

        let stored: VideoProject = load_one(&store, Collection::Videos, "v1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Edited by user");
        assert_eq!(stored.status, crate::domain::VideoStatus::Editing);
        assert_eq!(stored.priority_score, Some(6.0));
    }

    #[tokio::test]
    async fn listener_reacts_to_channel_saves() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let v = video("a", "c1", 4.0);
        save_typed(store.as_ref(), Collection::Videos, "a", &v).await.unwrap();

        let mut video_events = store.subscribe(Collection::Videos);
        let handle = spawn_rescore_listener(store.clone());

        save_typed(store.as_ref(), Collection::Channels, "c1", &channel("c1", 7))
            .await
            .unwrap();

        let event = tokio::time::timeout(std::time::Duration::from_secs(2), video_events.recv())
            .await
            .expect("rescore did not happen in time")
            .unwrap();
        match event {
            StoreEvent::Saved { doc, .. } => assert_eq!(doc["priorityScore"], 14.0),
            other => panic!("unexpected event: {other:?}"),
        }

        handle.abort();
    }
}
