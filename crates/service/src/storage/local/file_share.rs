use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::{fs, io::{AsyncSeekExt, AsyncWriteExt}, sync::{Mutex, RwLock}};

use super::validate_resource_name;
use crate::errors::StorageError;
use crate::storage::{validate_object_name, FileShareBackend, ShareFileInfo};

/// Each share is a directory; only its top level is used.
pub struct LocalFileShareBackend {
    root: PathBuf,
    write_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl LocalFileShareBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), write_locks: RwLock::new(HashMap::new()) }
    }

    async fn share_dir(&self, share: &str) -> Result<PathBuf, StorageError> {
        validate_resource_name(share)?;
        let dir = self.root.join(share);
        match fs::metadata(&dir).await {
            Ok(m) if m.is_dir() => Ok(dir),
            _ => Err(StorageError::NotFound(format!("share {share}"))),
        }
    }

    async fn write_lock(&self, share: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.write().await;
        Arc::clone(locks.entry(share.to_string()).or_default())
    }
}

fn modified(meta: &std::fs::Metadata) -> Option<DateTime<Utc>> {
    meta.modified().ok().map(DateTime::<Utc>::from)
}

#[async_trait]
impl FileShareBackend for LocalFileShareBackend {
    async fn create_share_if_not_exists(&self, share: &str) -> Result<(), StorageError> {
        validate_resource_name(share)?;
        fs::create_dir_all(self.root.join(share)).await?;
        Ok(())
    }

    async fn upload(&self, share: &str, name: &str, data: Bytes, declared_size: u64) -> Result<ShareFileInfo, StorageError> {
        validate_object_name(name)?;
        let actual = data.len() as u64;
        if actual > declared_size {
            return Err(StorageError::SizeExceeded { declared: declared_size, actual });
        }
        let dir = self.share_dir(share).await?;
        let lock = self.write_lock(share).await;
        let _guard = lock.lock().await;

        // 先按声明大小创建文件，再写入内容
        let path = dir.join(name);
        let mut file = fs::File::create(&path).await?;
        file.set_len(declared_size).await?;
        file.seek(std::io::SeekFrom::Start(0)).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        let meta = file.metadata().await?;

        Ok(ShareFileInfo { name: name.to_string(), size: meta.len(), last_modified: modified(&meta) })
    }

    async fn list(&self, share: &str) -> Result<Vec<ShareFileInfo>, StorageError> {
        let dir = self.share_dir(share).await?;
        let mut entries = fs::read_dir(&dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            files.push(ShareFileInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                last_modified: modified(&meta),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn download(&self, share: &str, name: &str) -> Result<Bytes, StorageError> {
        validate_object_name(name)?;
        let dir = self.share_dir(share).await?;
        match fs::read(dir.join(name)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("file {share}/{name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_if_exists(&self, share: &str, name: &str) -> Result<bool, StorageError> {
        validate_object_name(name)?;
        let dir = self.share_dir(share).await?;
        let lock = self.write_lock(share).await;
        let _guard = lock.lock().await;
        match fs::remove_file(dir.join(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
