use std::{collections::{BTreeMap, HashMap}, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::{fs, sync::{Mutex, RwLock}};
use uuid::Uuid;

use super::{validate_resource_name, JsonFileStore, StoreRegistry};
use crate::errors::StorageError;
use crate::storage::{validate_object_name, BlobBackend, BlobProperties};

type BlobIndex = BTreeMap<String, BlobProperties>;

/// Blobs live as plain files; their properties in a per-container index.
pub struct LocalBlobBackend {
    root: PathBuf,
    indexes: StoreRegistry<BlobIndex>,
    // 每个 container 一把写锁，串行化 内容写入 + 索引更新
    write_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl LocalBlobBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            indexes: StoreRegistry::new(root.clone(), ".index.json"),
            root,
            write_locks: RwLock::new(HashMap::new()),
        }
    }

    async fn index(&self, container: &str) -> Result<Arc<JsonFileStore<BlobIndex>>, StorageError> {
        validate_resource_name(container)?;
        self.indexes
            .get(container)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("container {container}")))
    }

    async fn write_lock(&self, container: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.write().await;
        Arc::clone(locks.entry(container.to_string()).or_default())
    }

    fn blob_path(&self, container: &str, name: &str) -> PathBuf {
        self.root.join(container).join(name)
    }
}

#[async_trait]
impl BlobBackend for LocalBlobBackend {
    async fn create_container_if_not_exists(&self, container: &str) -> Result<(), StorageError> {
        validate_resource_name(container)?;
        fs::create_dir_all(self.root.join(container)).await?;
        self.indexes.create(container).await?;
        Ok(())
    }

    async fn upload(&self, container: &str, name: &str, data: Bytes, content_type: &str) -> Result<BlobProperties, StorageError> {
        validate_object_name(name)?;
        let index = self.index(container).await?;
        let lock = self.write_lock(container).await;
        let _guard = lock.lock().await;

        fs::write(self.blob_path(container, name), &data).await?;
        let props = BlobProperties {
            name: name.to_string(),
            content_type: content_type.to_string(),
            size: data.len() as u64,
            last_modified: Utc::now(),
            etag: format!("\"{}\"", Uuid::new_v4()),
        };
        let stored = props.clone();
        index
            .update(move |idx| {
                idx.insert(stored.name.clone(), stored);
                Ok(())
            })
            .await?;
        Ok(props)
    }

    async fn list(&self, container: &str) -> Result<Vec<BlobProperties>, StorageError> {
        let index = self.index(container).await?;
        Ok(index.read(|idx| idx.values().cloned().collect()).await)
    }

    async fn download(&self, container: &str, name: &str) -> Result<Bytes, StorageError> {
        validate_object_name(name)?;
        let index = self.index(container).await?;
        if !index.read(|idx| idx.contains_key(name)).await {
            return Err(StorageError::NotFound(format!("blob {container}/{name}")));
        }
        let data = fs::read(self.blob_path(container, name)).await?;
        Ok(Bytes::from(data))
    }

    async fn delete_if_exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        validate_object_name(name)?;
        let index = self.index(container).await?;
        let lock = self.write_lock(container).await;
        let _guard = lock.lock().await;

        let existed = index.update(|idx| Ok(idx.remove(name).is_some())).await?;
        match fs::remove_file(self.blob_path(container, name)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::local::temp_root;

    async fn backend() -> LocalBlobBackend {
        let b = LocalBlobBackend::new(temp_root("blobs"));
        b.create_container_if_not_exists("product-images").await.unwrap();
        b
    }

    #[tokio::test]
    async fn upload_overwrites_and_downloads() {
        let b = backend().await;
        b.upload("product-images", "laptop.png", Bytes::from_static(b"v1"), "image/png").await.unwrap();
        let p = b.upload("product-images", "laptop.png", Bytes::from_static(b"v2!"), "image/png").await.unwrap();
        assert_eq!(p.size, 3);

        let listed = b.list("product-images").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content_type, "image/png");
        assert_eq!(b.download("product-images", "laptop.png").await.unwrap(), Bytes::from_static(b"v2!"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let b = backend().await;
        b.upload("product-images", "a.jpg", Bytes::from_static(b"x"), "image/jpeg").await.unwrap();
        assert!(b.delete_if_exists("product-images", "a.jpg").await.unwrap());
        assert!(!b.delete_if_exists("product-images", "a.jpg").await.unwrap());
        assert!(matches!(b.download("product-images", "a.jpg").await, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn bad_names_and_missing_container() {
        let b = backend().await;
        let res = b.upload("product-images", "../escape.png", Bytes::new(), "image/png").await;
        assert!(matches!(res, Err(StorageError::InvalidName(_))));
        assert!(matches!(b.list("missing").await, Err(StorageError::NotFound(_))));
        assert!(matches!(b.create_container_if_not_exists("Bad_Name").await, Err(StorageError::InvalidName(_))));
    }
}
