use std::{collections::VecDeque, path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_resource_name, JsonFileStore, StoreRegistry};
use crate::errors::StorageError;
use crate::storage::{PeekedMessage, QueueBackend, ReceivedMessage, DEFAULT_MESSAGE_TTL, MAX_PEEK_MESSAGES};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredMessage {
    message_id: String,
    text: String,
    inserted_on: DateTime<Utc>,
    visible_at: DateTime<Utc>,
    dequeue_count: u32,
    pop_receipt: Option<String>,
}

impl StoredMessage {
    fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.visible_at <= now
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.inserted_on >= ttl
    }
}

/// FIFO queue per file; invisible (leased) messages keep their position.
/// Expired messages are pruned on every write and skipped on read.
pub struct LocalQueueBackend {
    queues: StoreRegistry<VecDeque<StoredMessage>>,
    message_ttl: chrono::Duration,
}

impl LocalQueueBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_message_ttl(root, DEFAULT_MESSAGE_TTL)
    }

    pub fn with_message_ttl(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            queues: StoreRegistry::new(root.into(), ".json"),
            message_ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    async fn queue(&self, queue: &str) -> Result<Arc<JsonFileStore<VecDeque<StoredMessage>>>, StorageError> {
        validate_resource_name(queue)?;
        self.queues
            .get(queue)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("queue {queue}")))
    }
}

#[async_trait]
impl QueueBackend for LocalQueueBackend {
    async fn create_queue_if_not_exists(&self, queue: &str) -> Result<(), StorageError> {
        validate_resource_name(queue)?;
        self.queues.create(queue).await?;
        Ok(())
    }

    async fn send(&self, queue: &str, text: &str) -> Result<String, StorageError> {
        let store = self.queue(queue).await?;
        let now = Utc::now();
        let msg = StoredMessage {
            message_id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            inserted_on: now,
            visible_at: now,
            dequeue_count: 0,
            pop_receipt: None,
        };
        let id = msg.message_id.clone();
        let ttl = self.message_ttl;
        store
            .update(move |q| {
                q.retain(|m| !m.is_expired(now, ttl));
                q.push_back(msg);
                Ok(())
            })
            .await?;
        Ok(id)
    }

    async fn receive(&self, queue: &str, visibility_timeout: Duration) -> Result<Option<ReceivedMessage>, StorageError> {
        let store = self.queue(queue).await?;
        let lease = chrono::Duration::from_std(visibility_timeout)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        let ttl = self.message_ttl;
        store
            .update(move |q| {
                let now = Utc::now();
                q.retain(|m| !m.is_expired(now, ttl));
                let Some(msg) = q.iter_mut().find(|m| m.is_visible(now)) else {
                    return Ok(None);
                };
                let receipt = Uuid::new_v4().to_string();
                msg.pop_receipt = Some(receipt.clone());
                msg.visible_at = now + lease;
                msg.dequeue_count += 1;
                Ok(Some(ReceivedMessage {
                    message_id: msg.message_id.clone(),
                    pop_receipt: receipt,
                    text: msg.text.clone(),
                    inserted_on: msg.inserted_on,
                    dequeue_count: msg.dequeue_count,
                }))
            })
            .await
    }

    async fn peek(&self, queue: &str, max: usize) -> Result<Vec<PeekedMessage>, StorageError> {
        let store = self.queue(queue).await?;
        let now = Utc::now();
        let limit = max.min(MAX_PEEK_MESSAGES);
        let peeked = store
            .read(|q| {
                q.iter()
                    .filter(|m| m.is_visible(now) && !m.is_expired(now, self.message_ttl))
                    .take(limit)
                    .map(|m| PeekedMessage {
                        message_id: m.message_id.clone(),
                        text: m.text.clone(),
                        inserted_on: m.inserted_on,
                        dequeue_count: m.dequeue_count,
                    })
                    .collect()
            })
            .await;
        Ok(peeked)
    }

    async fn delete_message(&self, queue: &str, message_id: &str, pop_receipt: &str) -> Result<(), StorageError> {
        let store = self.queue(queue).await?;
        store
            .update(|q| {
                let pos = q
                    .iter()
                    .position(|m| m.message_id == message_id)
                    .ok_or_else(|| StorageError::NotFound(format!("message {message_id}")))?;
                if q[pos].pop_receipt.as_deref() != Some(pop_receipt) {
                    return Err(StorageError::PreconditionFailed(format!("message {message_id}")));
                }
                q.remove(pos);
                Ok(())
            })
            .await
    }
}
