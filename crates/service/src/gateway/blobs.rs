use bytes::Bytes;
use tracing::error;

use super::{notifications, settle, StorageGateway};
use crate::storage::{BlobProperties, Download};

const BACKEND: &str = "blob";

impl StorageGateway {
    /// Upload (overwriting) a product image. Returns its address, or an empty
    /// string on failure.
    pub async fn upload_image(&self, name: &str, data: Bytes, content_type: &str) -> String {
        let container = &self.names.blob_container;
        let res = self
            .blobs
            .upload(container, name, data, content_type)
            .await
            .inspect_err(|e| error!(op = "upload", container = %container, blob = name, error = %e, "blob operation failed"));
        match settle(BACKEND, "upload", res) {
            Some(_) => {
                self.notify(notifications::image_uploaded(name)).await;
                self.get_image_url(name)
            }
            None => String::new(),
        }
    }

    pub async fn list_images(&self) -> Vec<BlobProperties> {
        let container = &self.names.blob_container;
        let res = self
            .blobs
            .list(container)
            .await
            .inspect_err(|e| error!(op = "list", container = %container, error = %e, "blob operation failed"));
        settle(BACKEND, "list", res).unwrap_or_default()
    }

    pub async fn download_image(&self, name: &str) -> Download {
        let container = &self.names.blob_container;
        let res = self
            .blobs
            .download(container, name)
            .await
            .inspect_err(|e| error!(op = "download", container = %container, blob = name, error = %e, "blob operation failed"));
        settle(BACKEND, "download", res).map_or(Download::Empty, Download::Found)
    }

    /// Delete-if-exists: an absent image still counts as success.
    pub async fn delete_image(&self, name: &str) -> bool {
        let container = &self.names.blob_container;
        let res = self
            .blobs
            .delete_if_exists(container, name)
            .await
            .inspect_err(|e| error!(op = "delete", container = %container, blob = name, error = %e, "blob operation failed"));
        if settle(BACKEND, "delete", res).is_none() {
            return false;
        }
        self.notify(notifications::image_deleted(name)).await;
        true
    }

    /// Address of an image without touching the backend.
    pub fn get_image_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.blob_endpoint, self.names.blob_container, name)
    }
}
