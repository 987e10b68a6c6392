use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TableEntity;

/// Table-storage order. Customer/product references are soft and may dangle;
/// the two names are captured when the order is placed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Order {
    pub partition_key: String,
    pub row_key: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "odata.etag")]
    pub etag: String,
    pub customer_row_key: String,
    pub product_row_key: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_amount: f64,
    pub notes: String,
    pub status: String,
    pub date_created: DateTime<Utc>,
    pub customer_name: String,
    pub product_name: String,
}

impl Order {
    pub fn new(customer_row_key: &str, product_row_key: &str, quantity: i32, unit_price: f64) -> Self {
        let mut order = Self {
            partition_key: Self::PARTITION.to_string(),
            customer_row_key: customer_row_key.to_string(),
            product_row_key: product_row_key.to_string(),
            quantity,
            unit_price,
            status: "New".to_string(),
            date_created: Utc::now(),
            ..Default::default()
        };
        order.compute_total();
        order
    }

    /// Overwrite `total_amount` with `unit_price × quantity`.
    pub fn compute_total(&mut self) {
        self.total_amount = self.unit_price * f64::from(self.quantity);
    }
}

impl TableEntity for Order {
    const PARTITION: &'static str = "Order";
    const KIND: &'static str = "ORDER";

    fn row_key(&self) -> &str { &self.row_key }
    fn etag(&self) -> &str { &self.etag }

    fn assign_keys(&mut self, row_key: String) {
        self.partition_key = Self::PARTITION.to_string();
        self.row_key = row_key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_total_is_overwritten() {
        let mut o = Order::new("c1", "p1", 2, 15999.99);
        assert!((o.total_amount - 31999.98).abs() < 1e-9);
        o.total_amount = 1.0;
        o.quantity = 3;
        o.compute_total();
        assert!((o.total_amount - 47999.97).abs() < 1e-6);
        assert_eq!(o.status, "New");
    }
}
