use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TableEntity;

/// Table-storage product. Price stays `f64` for compatibility with existing rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Product {
    pub partition_key: String,
    pub row_key: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "odata.etag")]
    pub etag: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock_quantity: i32,
    pub image_url: String,
    pub date_created: DateTime<Utc>,
}

impl Product {
    pub fn new(name: &str, description: &str, price: f64, category: &str, stock_quantity: i32) -> Self {
        Self {
            partition_key: Self::PARTITION.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            stock_quantity,
            date_created: Utc::now(),
            ..Default::default()
        }
    }
}

impl TableEntity for Product {
    const PARTITION: &'static str = "Product";
    const KIND: &'static str = "PRODUCT";

    fn row_key(&self) -> &str { &self.row_key }
    fn etag(&self) -> &str { &self.etag }

    fn assign_keys(&mut self, row_key: String) {
        self.partition_key = Self::PARTITION.to_string();
        self.row_key = row_key;
    }
}
