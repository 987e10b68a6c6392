//! Table-storage entities.
//!
//! Rows are schema-less: [`TableRow`] carries the system properties
//! (`PartitionKey`, `RowKey`, `Timestamp`, `odata.etag`) and a free-form
//! property bag. Typed entities convert to and from it through JSON.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

mod customer_profile;
mod order;
mod product;

pub use customer_profile::CustomerProfile;
pub use order::Order;
pub use product::Product;

/// ETag value that matches any stored version.
pub const ETAG_ANY: &str = "*";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "PartitionKey")]
    pub partition_key: String,
    #[serde(rename = "RowKey")]
    pub row_key: String,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "odata.etag", default)]
    pub etag: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl TableRow {
    pub fn from_entity<T: Serialize>(entity: &T) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(entity)?)
    }

    pub fn into_entity<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

/// A typed row living in a fixed partition.
pub trait TableEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const PARTITION: &'static str;
    /// Upper-case tag used in notifications, e.g. `CUSTOMER`.
    const KIND: &'static str;

    fn row_key(&self) -> &str;
    fn etag(&self) -> &str;
    /// Set partition and row key before insert.
    fn assign_keys(&mut self, row_key: String);
}

pub fn new_row_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_keeps_system_fields_apart_from_properties() {
        let mut c = CustomerProfile::new("Jane", "Smith", "jane@example.com", "082", "1 Road");
        c.assign_keys("rk-1".into());
        c.etag = "W/\"1\"".into();
        let row = TableRow::from_entity(&c).unwrap();
        assert_eq!(row.partition_key, "Customer");
        assert_eq!(row.row_key, "rk-1");
        assert_eq!(row.etag, "W/\"1\"");
        assert_eq!(row.properties["FirstName"], "Jane");
        assert!(!row.properties.contains_key("RowKey"));
        assert!(!row.properties.contains_key("odata.etag"));

        let back: CustomerProfile = row.into_entity().unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn missing_properties_default() {
        let row = TableRow {
            partition_key: "Product".into(),
            row_key: "p1".into(),
            ..Default::default()
        };
        let p: Product = row.into_entity().unwrap();
        assert_eq!(p.row_key, "p1");
        assert_eq!(p.name, "");
        assert_eq!(p.stock_quantity, 0);
    }

    #[test]
    fn row_keys_unique() {
        assert_ne!(new_row_key(), new_row_key());
    }
}
