use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TableEntity;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CustomerProfile {
    pub partition_key: String,
    pub row_key: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "odata.etag")]
    pub etag: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_created: DateTime<Utc>,
}

impl CustomerProfile {
    pub fn new(first_name: &str, last_name: &str, email: &str, phone: &str, address: &str) -> Self {
        Self {
            partition_key: Self::PARTITION.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
            date_created: Utc::now(),
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TableEntity for CustomerProfile {
    const PARTITION: &'static str = "Customer";
    const KIND: &'static str = "CUSTOMER";

    fn row_key(&self) -> &str { &self.row_key }
    fn etag(&self) -> &str { &self.etag }

    fn assign_keys(&mut self, row_key: String) {
        self.partition_key = Self::PARTITION.to_string();
        self.row_key = row_key;
    }
}
