//! Queue message texts.

use chrono::{DateTime, Utc};

use models::table::{CustomerProfile, Order, Product};

pub fn order_created(o: &Order) -> String {
    format!(
        "[ORDER_CREATED] #{} for '{}' - {} x '{}' @ {:.2} = {:.2}",
        o.row_key, o.customer_name, o.quantity, o.product_name, o.unit_price, o.total_amount
    )
}

pub fn order_updated(o: &Order) -> String {
    format!(
        "[ORDER_UPDATED] #{} status '{}' - {} x @ {:.2} = {:.2}",
        o.row_key, o.status, o.quantity, o.unit_price, o.total_amount
    )
}

pub fn customer_created(c: &CustomerProfile) -> String {
    format!("[CUSTOMER_CREATED] #{} '{}'", c.row_key, c.full_name())
}

pub fn customer_updated(c: &CustomerProfile) -> String {
    format!("[CUSTOMER_UPDATED] #{} '{}'", c.row_key, c.full_name())
}

pub fn product_created(p: &Product) -> String {
    format!("[PRODUCT_CREATED] #{} '{}' @ {:.2}", p.row_key, p.name, p.price)
}

pub fn product_updated(p: &Product) -> String {
    format!("[PRODUCT_UPDATED] #{} '{}' @ {:.2}", p.row_key, p.name, p.price)
}

/// `[CUSTOMER_DELETED] #rk`, `[PRODUCT_DELETED] #rk`, `[ORDER_DELETED] #rk`
pub fn deleted(kind: &str, row_key: &str) -> String {
    format!("[{kind}_DELETED] #{row_key}")
}

pub fn image_uploaded(name: &str) -> String { format!("Image uploaded: {name}") }
pub fn image_deleted(name: &str) -> String { format!("Image deleted: {name}") }
pub fn contract_uploaded(name: &str) -> String { format!("Contract file uploaded: {name}") }
pub fn contract_deleted(name: &str) -> String { format!("Contract file deleted: {name}") }

/// `[yyyy-MM-dd HH:mm:ss UTC] [KIND] text`
pub fn compose(kind: &str, text: &str, at: DateTime<Utc>) -> String {
    format!("[{} UTC] [{kind}] {text}", at.format("%Y-%m-%d %H:%M:%S"))
}

pub fn order_processing(order_id: &str, customer: &str, amount: f64) -> String {
    format!("Processing order #{order_id} for customer '{customer}' - Amount: ${amount:.2}")
}

pub fn inventory_update(product: &str, action: &str, quantity: i32) -> String {
    format!("Inventory {action}: {quantity} units of '{product}'")
}
