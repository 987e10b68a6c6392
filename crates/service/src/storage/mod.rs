//! Backend seams of the storage gateway.
//!
//! Each trait stands in for one remote storage service (table, blob,
//! queue, file share). Implementations report typed [`StorageError`]s;
//! collapsing them into falsy results is the gateway's job.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use models::table::TableRow;

use crate::errors::StorageError;

pub mod json_store;
pub mod local;

/// Hard cap on peeked messages per call.
pub const MAX_PEEK_MESSAGES: usize = 32;
/// Lease given to a received message before it becomes visible again.
pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);
/// Messages older than this are dropped, whether or not they were received.
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[async_trait]
pub trait TableBackend: Send + Sync {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<(), StorageError>;
    /// Insert a new row; `Conflict` when the keys are taken. Returns the row
    /// with its fresh ETag and Timestamp.
    async fn insert(&self, table: &str, row: TableRow) -> Result<TableRow, StorageError>;
    async fn get(&self, table: &str, partition_key: &str, row_key: &str) -> Result<TableRow, StorageError>;
    /// All rows, optionally restricted to one partition.
    async fn query(&self, table: &str, partition_key: Option<&str>) -> Result<Vec<TableRow>, StorageError>;
    /// Replace a row if `if_match` matches the stored ETag.
    async fn update(&self, table: &str, row: TableRow, if_match: &str) -> Result<TableRow, StorageError>;
    async fn delete(&self, table: &str, partition_key: &str, row_key: &str, if_match: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobProperties {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub etag: String,
}

#[async_trait]
pub trait BlobBackend: Send + Sync {
    async fn create_container_if_not_exists(&self, container: &str) -> Result<(), StorageError>;
    /// Overwrites an existing blob of the same name.
    async fn upload(&self, container: &str, name: &str, data: Bytes, content_type: &str) -> Result<BlobProperties, StorageError>;
    async fn list(&self, container: &str) -> Result<Vec<BlobProperties>, StorageError>;
    async fn download(&self, container: &str, name: &str) -> Result<Bytes, StorageError>;
    /// Returns whether the blob existed.
    async fn delete_if_exists(&self, container: &str, name: &str) -> Result<bool, StorageError>;
}

/// A message returned by peek; carries no receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeekedMessage {
    pub message_id: String,
    pub text: String,
    pub inserted_on: DateTime<Utc>,
    pub dequeue_count: u32,
}

/// A leased message. `pop_receipt` authorizes its deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: String,
    pub pop_receipt: String,
    pub text: String,
    pub inserted_on: DateTime<Utc>,
    pub dequeue_count: u32,
}

#[async_trait]
pub trait QueueBackend: Send + Sync {
    async fn create_queue_if_not_exists(&self, queue: &str) -> Result<(), StorageError>;
    /// Returns the new message id.
    async fn send(&self, queue: &str, text: &str) -> Result<String, StorageError>;
    /// Lease the oldest visible message for `visibility_timeout`.
    async fn receive(&self, queue: &str, visibility_timeout: Duration) -> Result<Option<ReceivedMessage>, StorageError>;
    /// Visible messages, oldest first, at most `max` (itself capped at [`MAX_PEEK_MESSAGES`]).
    async fn peek(&self, queue: &str, max: usize) -> Result<Vec<PeekedMessage>, StorageError>;
    async fn delete_message(&self, queue: &str, message_id: &str, pop_receipt: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareFileInfo {
    pub name: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait FileShareBackend: Send + Sync {
    async fn create_share_if_not_exists(&self, share: &str) -> Result<(), StorageError>;
    /// Create the file with `declared_size` bytes, then write `data` into it.
    async fn upload(&self, share: &str, name: &str, data: Bytes, declared_size: u64) -> Result<ShareFileInfo, StorageError>;
    /// Files in the share root; directories are skipped.
    async fn list(&self, share: &str) -> Result<Vec<ShareFileInfo>, StorageError>;
    async fn download(&self, share: &str, name: &str) -> Result<Bytes, StorageError>;
    async fn delete_if_exists(&self, share: &str, name: &str) -> Result<bool, StorageError>;
}

/// Outcome of a gateway download. `Empty` means there was nothing to read,
/// whether the object is missing or the read failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Download {
    Found(Bytes),
    Empty,
}

impl Download {
    pub fn is_empty(&self) -> bool {
        matches!(self, Download::Empty)
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            Download::Found(b) => b,
            Download::Empty => Bytes::new(),
        }
    }
}

/// Blob and file names are flat: non-empty, no separators, no `..`.
pub fn validate_object_name(name: &str) -> Result<(), StorageError> {
    let bad = name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.contains('\0');
    if bad {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}
