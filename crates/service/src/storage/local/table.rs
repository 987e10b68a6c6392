use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use models::table::{TableRow, ETAG_ANY};

use super::{JsonFileStore, StoreRegistry};
use crate::errors::StorageError;
use crate::storage::TableBackend;

/// partition key -> row key -> row
type TableDoc = BTreeMap<String, BTreeMap<String, TableRow>>;

pub struct LocalTableBackend {
    tables: StoreRegistry<TableDoc>,
}

impl LocalTableBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { tables: StoreRegistry::new(root.into(), ".json") }
    }

    async fn table(&self, table: &str) -> Result<Arc<JsonFileStore<TableDoc>>, StorageError> {
        validate_table_name(table)?;
        self.tables
            .get(table)
            .await?
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))
    }
}

fn validate_table_name(table: &str) -> Result<(), StorageError> {
    if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StorageError::InvalidName(table.to_string()));
    }
    Ok(())
}

fn new_etag() -> String {
    format!("W/\"{}\"", Uuid::new_v4())
}

fn etag_matches(stored: &str, if_match: &str) -> bool {
    if_match == ETAG_ANY || (!if_match.is_empty() && stored == if_match)
}

fn stamp(row: &mut TableRow) {
    row.timestamp = Some(Utc::now());
    row.etag = new_etag();
}

#[async_trait]
impl TableBackend for LocalTableBackend {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<(), StorageError> {
        validate_table_name(table)?;
        self.tables.create(table).await?;
        debug!(table, "table ready");
        Ok(())
    }

    async fn insert(&self, table: &str, mut row: TableRow) -> Result<TableRow, StorageError> {
        if row.partition_key.is_empty() || row.row_key.is_empty() {
            return Err(StorageError::InvalidName(format!("{}/{}", row.partition_key, row.row_key)));
        }
        let store = self.table(table).await?;
        store
            .update(move |doc| {
                let partition = doc.entry(row.partition_key.clone()).or_default();
                if partition.contains_key(&row.row_key) {
                    return Err(StorageError::Conflict(format!("{}/{}", row.partition_key, row.row_key)));
                }
                stamp(&mut row);
                partition.insert(row.row_key.clone(), row.clone());
                Ok(row)
            })
            .await
    }

    async fn get(&self, table: &str, partition_key: &str, row_key: &str) -> Result<TableRow, StorageError> {
        let store = self.table(table).await?;
        store
            .read(|doc| doc.get(partition_key).and_then(|p| p.get(row_key)).cloned())
            .await
            .ok_or_else(|| StorageError::NotFound(format!("{partition_key}/{row_key}")))
    }

    async fn query(&self, table: &str, partition_key: Option<&str>) -> Result<Vec<TableRow>, StorageError> {
        let store = self.table(table).await?;
        let rows: Vec<TableRow> = store
            .read(|doc| match partition_key {
                Some(pk) => doc.get(pk).map(|p| p.values().cloned().collect()).unwrap_or_default(),
                None => doc.values().flat_map(|p| p.values().cloned()).collect(),
            })
            .await;
        Ok(rows)
    }

    async fn update(&self, table: &str, mut row: TableRow, if_match: &str) -> Result<TableRow, StorageError> {
        let store = self.table(table).await?;
        let if_match = if_match.to_string();
        store
            .update(move |doc| {
                let key = format!("{}/{}", row.partition_key, row.row_key);
                let stored = doc
                    .get_mut(&row.partition_key)
                    .and_then(|p| p.get_mut(&row.row_key))
                    .ok_or_else(|| StorageError::NotFound(key.clone()))?;
                // compare-and-swap on the version stamp
                if !etag_matches(&stored.etag, &if_match) {
                    return Err(StorageError::PreconditionFailed(key));
                }
                stamp(&mut row);
                *stored = row.clone();
                Ok(row)
            })
            .await
    }

    async fn delete(&self, table: &str, partition_key: &str, row_key: &str, if_match: &str) -> Result<(), StorageError> {
        let store = self.table(table).await?;
        store
            .update(|doc| {
                let key = format!("{partition_key}/{row_key}");
                let partition = doc
                    .get_mut(partition_key)
                    .ok_or_else(|| StorageError::NotFound(key.clone()))?;
                let stored = partition.get(row_key).ok_or_else(|| StorageError::NotFound(key.clone()))?;
                if !etag_matches(&stored.etag, if_match) {
                    return Err(StorageError::PreconditionFailed(key));
                }
                partition.remove(row_key);
                if partition.is_empty() {
                    doc.remove(partition_key);
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::local::temp_root;
    use serde_json::json;

    fn row(pk: &str, rk: &str, name: &str) -> TableRow {
        let mut r = TableRow { partition_key: pk.into(), row_key: rk.into(), ..Default::default() };
        r.properties.insert("Name".into(), json!(name));
        r
    }

    async fn backend() -> LocalTableBackend {
        let b = LocalTableBackend::new(temp_root("tables"));
        b.create_table_if_not_exists("Products").await.unwrap();
        b
    }

    #[tokio::test]
    async fn insert_stamps_and_rejects_duplicates() {
        let b = backend().await;
        let stored = b.insert("Products", row("Product", "p1", "Laptop")).await.unwrap();
        assert!(stored.timestamp.is_some());
        assert!(!stored.etag.is_empty());
        assert!(matches!(
            b.insert("Products", row("Product", "p1", "Other")).await,
            Err(StorageError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn stale_etag_rejected_and_row_unchanged() {
        let b = backend().await;
        let v1 = b.insert("Products", row("Product", "p1", "Laptop")).await.unwrap();
        let v2 = b.update("Products", row("Product", "p1", "Laptop Pro"), &v1.etag).await.unwrap();
        assert_ne!(v1.etag, v2.etag);

        let res = b.update("Products", row("Product", "p1", "Stale"), &v1.etag).await;
        assert!(matches!(res, Err(StorageError::PreconditionFailed(_))));
        let now = b.get("Products", "Product", "p1").await.unwrap();
        assert_eq!(now.properties["Name"], "Laptop Pro");
        assert_eq!(now.etag, v2.etag);

        // empty tag never matches, wildcard always does
        assert!(b.update("Products", row("Product", "p1", "x"), "").await.is_err());
        assert!(b.update("Products", row("Product", "p1", "Any"), ETAG_ANY).await.is_ok());
    }

    #[tokio::test]
    async fn query_delete_and_missing_table() {
        let b = backend().await;
        b.insert("Products", row("Product", "b", "B")).await.unwrap();
        b.insert("Products", row("Product", "a", "A")).await.unwrap();
        b.insert("Products", row("Other", "c", "C")).await.unwrap();
        assert_eq!(b.query("Products", None).await.unwrap().len(), 3);
        let product_rows = b.query("Products", Some("Product")).await.unwrap();
        let keys: Vec<_> = product_rows.iter().map(|r| r.row_key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);

        b.delete("Products", "Product", "a", ETAG_ANY).await.unwrap();
        assert!(matches!(b.get("Products", "Product", "a").await, Err(StorageError::NotFound(_))));
        assert!(matches!(b.delete("Products", "Product", "a", ETAG_ANY).await, Err(StorageError::NotFound(_))));

        assert!(matches!(b.query("Missing", None).await, Err(StorageError::TableNotFound(_))));
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let root = temp_root("tables_reopen");
        let b = LocalTableBackend::new(&root);
        b.create_table_if_not_exists("Orders").await.unwrap();
        b.insert("Orders", row("Order", "o1", "x")).await.unwrap();

        let reopened = LocalTableBackend::new(&root);
        assert_eq!(reopened.get("Orders", "Order", "o1").await.unwrap().row_key, "o1");
    }
}
