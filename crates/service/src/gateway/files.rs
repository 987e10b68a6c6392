use bytes::Bytes;
use tracing::error;

use super::{notifications, settle, StorageGateway};
use crate::storage::Download;

const BACKEND: &str = "file";

impl StorageGateway {
    /// Store a contract document in the share root. The file is created with
    /// the content length before the content is written.
    pub async fn upload_file(&self, name: &str, data: Bytes) -> bool {
        let share = &self.names.file_share;
        let size = data.len() as u64;
        let res = self
            .files
            .upload(share, name, data, size)
            .await
            .inspect_err(|e| error!(op = "upload", share = %share, file = name, error = %e, "file operation failed"));
        if settle(BACKEND, "upload", res).is_none() {
            return false;
        }
        self.notify(notifications::contract_uploaded(name)).await;
        true
    }

    /// File names in the share root; directories are not included.
    pub async fn list_files(&self) -> Vec<String> {
        let share = &self.names.file_share;
        let res = self
            .files
            .list(share)
            .await
            .inspect_err(|e| error!(op = "list", share = %share, error = %e, "file operation failed"));
        settle(BACKEND, "list", res)
            .unwrap_or_default()
            .into_iter()
            .map(|f| f.name)
            .collect()
    }

    pub async fn download_file(&self, name: &str) -> Download {
        let share = &self.names.file_share;
        let res = self
            .files
            .download(share, name)
            .await
            .inspect_err(|e| error!(op = "download", share = %share, file = name, error = %e, "file operation failed"));
        settle(BACKEND, "download", res).map_or(Download::Empty, Download::Found)
    }

    pub async fn delete_file(&self, name: &str) -> bool {
        let share = &self.names.file_share;
        let res = self
            .files
            .delete_if_exists(share, name)
            .await
            .inspect_err(|e| error!(op = "delete", share = %share, file = name, error = %e, "file operation failed"));
        if settle(BACKEND, "delete", res).is_none() {
            return false;
        }
        self.notify(notifications::contract_deleted(name)).await;
        true
    }
}
