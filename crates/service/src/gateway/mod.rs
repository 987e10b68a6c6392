//! Storage gateway: one method per entity operation over the table, blob,
//! queue and file-share backends.
//!
//! Every backend error is logged and collapsed into `false` / `None` /
//! empty / [`Download::Empty`]. Nothing escapes to the caller.

use std::sync::Arc;

use tracing::{info, warn};

use configs::StorageConfig;

use crate::errors::StorageError;
use crate::observability;
use crate::storage::{local::LocalBackends, BlobBackend, FileShareBackend, QueueBackend, TableBackend};

mod blobs;
mod files;
pub mod notifications;
mod queues;
mod tables;

#[cfg(test)]
mod tests;

pub use crate::storage::Download;
pub use queues::DEFAULT_PEEK_COUNT;

/// Resource names the gateway addresses.
#[derive(Clone, Debug)]
pub struct StorageNames {
    pub customer_table: String,
    pub product_table: String,
    pub order_table: String,
    pub blob_container: String,
    pub queue_name: String,
    pub file_share: String,
}

impl From<&StorageConfig> for StorageNames {
    fn from(cfg: &StorageConfig) -> Self {
        Self {
            customer_table: cfg.customer_table.clone(),
            product_table: cfg.product_table.clone(),
            order_table: cfg.order_table.clone(),
            blob_container: cfg.blob_container.clone(),
            queue_name: cfg.queue_name.clone(),
            file_share: cfg.file_share.clone(),
        }
    }
}

#[derive(Clone)]
pub struct StorageGateway {
    tables: Arc<dyn TableBackend>,
    blobs: Arc<dyn BlobBackend>,
    queues: Arc<dyn QueueBackend>,
    files: Arc<dyn FileShareBackend>,
    names: StorageNames,
    blob_endpoint: String,
}

impl StorageGateway {
    pub fn new(
        tables: Arc<dyn TableBackend>,
        blobs: Arc<dyn BlobBackend>,
        queues: Arc<dyn QueueBackend>,
        files: Arc<dyn FileShareBackend>,
        names: StorageNames,
        blob_endpoint: impl Into<String>,
    ) -> Self {
        Self { tables, blobs, queues, files, names, blob_endpoint: blob_endpoint.into() }
    }

    /// Build the local backends from the connection string and make sure every
    /// table, container, queue and share exists.
    pub async fn connect(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let conn = cfg.connection()?;
        let local = LocalBackends::new(&conn.data_root);
        let gateway = Self::new(
            local.tables,
            local.blobs,
            local.queues,
            local.files,
            StorageNames::from(cfg),
            conn.blob_endpoint,
        );
        gateway.initialize().await;
        info!(data_root = %conn.data_root.display(), "storage gateway ready");
        Ok(gateway)
    }

    /// Create missing storage resources. Failures are logged, never fatal.
    pub async fn initialize(&self) {
        let n = &self.names;
        for table in [&n.customer_table, &n.product_table, &n.order_table] {
            if let Err(e) = self.tables.create_table_if_not_exists(table).await {
                warn!(table = %table, error = %e, "error initializing storage");
            }
        }
        if let Err(e) = self.blobs.create_container_if_not_exists(&n.blob_container).await {
            warn!(container = %n.blob_container, error = %e, "error initializing storage");
        }
        if let Err(e) = self.queues.create_queue_if_not_exists(&n.queue_name).await {
            warn!(queue = %n.queue_name, error = %e, "error initializing storage");
        }
        if let Err(e) = self.files.create_share_if_not_exists(&n.file_share).await {
            warn!(share = %n.file_share, error = %e, "error initializing storage");
        }
    }

    /// Best-effort notification; failure is logged and counted only.
    async fn notify(&self, text: String) {
        if let Err(e) = self.queues.send(&self.names.queue_name, &text).await {
            observability::NOTIFICATIONS_FAILED_TOTAL.inc();
            warn!(queue = %self.names.queue_name, error = %e, "notification not sent");
        }
    }
}

/// Count the outcome and turn an error into `None`.
fn settle<T>(backend: &'static str, op: &'static str, res: Result<T, StorageError>) -> Option<T> {
    observability::record(backend, op, res.is_ok());
    res.ok()
}
