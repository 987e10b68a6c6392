use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};

use crate::errors::StorageError;

/// A JSON document persisted to a single file.
///
/// Mutations run against a copy and are written back before the in-memory
/// state is swapped, so a failed closure or write leaves both unchanged.
pub struct JsonFileStore<T> {
    inner: RwLock<T>,
    file_path: PathBuf,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync,
{
    /// Load the document from `path`, creating it (and its parent) if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let doc: T = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = T::default();
                write_atomic(&file_path, &serde_json::to_vec(&empty)?).await?;
                empty
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { inner: RwLock::new(doc), file_path })
    }

    /// Run a read-only closure against the current document.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let doc = self.inner.read().await;
        f(&doc)
    }

    /// Apply a mutation and persist it. Holds the write lock for the whole
    /// read-modify-write, so concurrent updates are serialized.
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> Result<R, StorageError>) -> Result<R, StorageError> {
        let mut doc = self.inner.write().await;
        let mut next = doc.clone();
        let out = f(&mut next)?;
        write_atomic(&self.file_path, &serde_json::to_vec(&next)?).await?;
        *doc = next;
        Ok(out)
    }
}

async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn json_file_store_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_file_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonFileStore::<HashMap<String, String>>::open(&tmp).await?;

        // initially empty
        assert_eq!(store.read(|m| m.len()).await, 0);

        store
            .update(|m| {
                m.insert("a".into(), "1".into());
                m.insert("b".into(), "2".into());
                Ok(())
            })
            .await?;

        // failed closure leaves the document untouched
        let res = store
            .update(|m| {
                m.clear();
                Err::<(), _>(StorageError::Conflict("a".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.read(|m| m.len()).await, 2);

        let reloaded = JsonFileStore::<HashMap<String, String>>::open(&tmp).await?;
        assert_eq!(reloaded.read(|m| m.get("a").cloned()).await.as_deref(), Some("1"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
