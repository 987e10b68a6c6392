//! File-system backed implementations of the storage backends.
//!
//! Layout under the data root:
//! `tables/<table>.json`, `blobs/<container>/<name>` plus
//! `blobs/<container>.index.json`, `queues/<queue>.json`,
//! `shares/<share>/<name>`.

use std::{collections::HashMap, path::{Path, PathBuf}, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use super::json_store::JsonFileStore;
use crate::errors::StorageError;

mod blob;
mod file_share;
mod queue;
mod table;

pub use blob::LocalBlobBackend;
pub use file_share::LocalFileShareBackend;
pub use queue::LocalQueueBackend;
pub use table::LocalTableBackend;

/// All four local backends rooted at one directory.
pub struct LocalBackends {
    pub tables: Arc<LocalTableBackend>,
    pub blobs: Arc<LocalBlobBackend>,
    pub queues: Arc<LocalQueueBackend>,
    pub files: Arc<LocalFileShareBackend>,
}

impl LocalBackends {
    pub fn new(data_root: &Path) -> Self {
        Self {
            tables: Arc::new(LocalTableBackend::new(data_root.join("tables"))),
            blobs: Arc::new(LocalBlobBackend::new(data_root.join("blobs"))),
            queues: Arc::new(LocalQueueBackend::new(data_root.join("queues"))),
            files: Arc::new(LocalFileShareBackend::new(data_root.join("shares"))),
        }
    }
}

/// Lazily opened JSON documents, one per named resource.
pub(crate) struct StoreRegistry<T> {
    dir: PathBuf,
    suffix: &'static str,
    stores: RwLock<HashMap<String, Arc<JsonFileStore<T>>>>,
}

impl<T> StoreRegistry<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync,
{
    pub(crate) fn new(dir: PathBuf, suffix: &'static str) -> Self {
        Self { dir, suffix, stores: RwLock::new(HashMap::new()) }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{}", self.suffix))
    }

    /// Open the document, creating it when missing. Idempotent.
    pub(crate) async fn create(&self, name: &str) -> Result<Arc<JsonFileStore<T>>, StorageError> {
        let mut stores = self.stores.write().await;
        if let Some(s) = stores.get(name) {
            return Ok(Arc::clone(s));
        }
        let store = Arc::new(JsonFileStore::open(self.path(name)).await?);
        stores.insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// The document if it was created before, possibly by an earlier process.
    pub(crate) async fn get(&self, name: &str) -> Result<Option<Arc<JsonFileStore<T>>>, StorageError> {
        if let Some(s) = self.stores.read().await.get(name) {
            return Ok(Some(Arc::clone(s)));
        }
        if tokio::fs::metadata(self.path(name)).await.is_err() {
            return Ok(None);
        }
        self.create(name).await.map(Some)
    }
}

/// Container/queue/share names: lowercase letters, digits and `-`.
pub(crate) fn validate_resource_name(name: &str) -> Result<(), StorageError> {
    let ok = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !ok {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn temp_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("abc_retail_{tag}_{}", uuid::Uuid::new_v4()))
}
