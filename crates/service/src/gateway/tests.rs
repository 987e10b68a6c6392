use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;

use configs::StorageConfig;
use models::table::{CustomerProfile, Order, Product, TableEntity, TableRow};

use super::{StorageGateway, StorageNames};
use crate::errors::StorageError;
use crate::storage::{
    local::{temp_root, LocalBackends},
    BlobBackend, BlobProperties, Download, FileShareBackend, PeekedMessage, QueueBackend,
    ReceivedMessage, ShareFileInfo, TableBackend,
};

async fn local_gateway() -> StorageGateway {
    let cfg = StorageConfig {
        connection_string: format!(
            "DataRoot={};BlobEndpoint=http://127.0.0.1:10000/devstoreaccount1",
            temp_root("gateway").display()
        ),
        ..Default::default()
    };
    StorageGateway::connect(&cfg).await.unwrap()
}

fn jane() -> CustomerProfile {
    CustomerProfile::new("Jane", "Smith", "jane.smith@example.com", "0827654321", "456 Oak Ave")
}

#[tokio::test]
async fn customer_crud_with_optimistic_concurrency() {
    let gw = local_gateway().await;
    let added = gw.add_customer_profile(jane()).await.unwrap();
    assert_eq!(added.partition_key, "Customer");
    assert!(!added.row_key.is_empty());
    assert!(!added.etag.is_empty());
    assert!(added.timestamp.is_some());

    let other = gw.add_customer_profile(jane()).await.unwrap();
    assert_ne!(added.row_key, other.row_key);
    assert_eq!(gw.list_customer_profiles().await.len(), 2);

    // current token succeeds
    let mut edit = gw.get_customer_profile("Customer", &added.row_key).await.unwrap();
    edit.phone = "0820000000".into();
    assert!(gw.update_customer_profile(&edit).await);

    // stale token fails and leaves the row alone
    let mut stale = added.clone();
    stale.first_name = "Janet".into();
    assert!(!gw.update_customer_profile(&stale).await);
    let now = gw.get_customer_profile("Customer", &added.row_key).await.unwrap();
    assert_eq!(now.first_name, "Jane");
    assert_eq!(now.phone, "0820000000");
    assert_eq!(now.email, added.email);

    assert!(gw.delete_customer_profile("Customer", &added.row_key).await);
    assert!(gw.get_customer_profile("Customer", &added.row_key).await.is_none());
    assert!(!gw.delete_customer_profile("Customer", &added.row_key).await);

    let messages = gw.get_queue_messages(32).await;
    assert!(messages[0].starts_with("[CUSTOMER_CREATED]"));
    assert!(messages.iter().any(|m| m.starts_with("[CUSTOMER_UPDATED]")));
    assert!(messages.iter().any(|m| m == &format!("[CUSTOMER_DELETED] #{}", added.row_key)));
}

#[tokio::test]
async fn place_order_end_to_end() {
    let gw = local_gateway().await;
    let customer = gw.add_customer_profile(jane()).await.unwrap();
    let product = gw
        .add_product(Product::new("Laptop", "High-performance laptop", 15999.99, "Electronics", 50))
        .await
        .unwrap();

    let order = gw.place_order(&customer.row_key, &product.row_key, 2, "gift wrap").await.unwrap();
    assert!((order.total_amount - 31999.98).abs() < 1e-9);
    assert_eq!(order.status, "New");
    assert_eq!(order.customer_name, "Jane Smith");
    assert_eq!(order.product_name, "Laptop");
    assert_eq!(order.partition_key, "Order");

    let messages = gw.get_queue_messages(10).await;
    assert!(messages.iter().any(|m| m.contains("ORDER_CREATED") && m.contains(&order.row_key)));

    assert!(gw.place_order(&customer.row_key, &product.row_key, 0, "").await.is_none());
    assert!(gw.place_order("missing", &product.row_key, 1, "").await.is_none());
    assert!(gw.place_order(&customer.row_key, "missing", 1, "").await.is_none());
}

#[tokio::test]
async fn order_totals_are_recomputed() {
    let gw = local_gateway().await;
    let mut order = Order::new("c", "p", 3, 10.0);
    order.total_amount = 1.0;
    let added = gw.add_order(order).await.unwrap();
    assert!((added.total_amount - 30.0).abs() < 1e-9);

    let mut edit = added.clone();
    edit.quantity = 5;
    edit.total_amount = 999.0;
    edit.status = "Processing".into();
    assert!(gw.update_order(&edit).await);
    let stored = gw.get_order("Order", &added.row_key).await.unwrap();
    assert!((stored.total_amount - 50.0).abs() < 1e-9);
    assert_eq!(stored.status, "Processing");

    // second update with the old token is stale
    assert!(!gw.update_order(&edit).await);
    assert_eq!(gw.list_orders().await.len(), 1);
    assert!(gw.delete_order("Order", &added.row_key).await);
}

#[tokio::test]
async fn product_crud() {
    let gw = local_gateway().await;
    let p = gw.add_product(Product::new("Office Chair", "Ergonomic", 2499.99, "Furniture", 100)).await.unwrap();
    let mut edit = p.clone();
    edit.stock_quantity = 90;
    assert!(gw.update_product(&edit).await);
    assert_eq!(gw.get_product("Product", &p.row_key).await.unwrap().stock_quantity, 90);
    assert_eq!(gw.list_products().await.len(), 1);
    assert!(gw.delete_product("Product", &p.row_key).await);
    assert!(gw.list_products().await.is_empty());
    let messages = gw.get_queue_messages(10).await;
    assert_eq!(messages[0], format!("[PRODUCT_CREATED] #{} 'Office Chair' @ 2499.99", p.row_key));
}

#[tokio::test]
async fn peek_returns_same_messages_in_order() {
    let gw = local_gateway().await;
    for t in ["first", "second", "third"] {
        assert!(gw.send_message(t).await);
    }
    let once = gw.get_queue_messages(5).await;
    let twice = gw.get_queue_messages(5).await;
    assert_eq!(once, ["first", "second", "third"]);
    assert_eq!(once, twice);
    assert!(gw.get_queue_messages(0).await.is_empty());

    assert_eq!(gw.receive_message().await.as_deref(), Some("first"));
    assert_eq!(gw.get_queue_messages(5).await, ["second", "third"]);
}

#[tokio::test]
async fn receive_on_empty_queue_is_none() {
    let gw = local_gateway().await;
    assert!(gw.receive_message().await.is_none());
    assert!(!gw.delete_message("nope", "nope").await);
}

#[tokio::test]
async fn composed_messages() {
    let gw = local_gateway().await;
    assert!(!gw.send_general_message("General", "   ").await);
    assert!(gw.send_general_message("", "hello").await);
    assert!(gw.send_order_processing("42", "Jane Smith", 31999.98).await);
    assert!(gw.send_inventory_update("Laptop", "restock", 5).await);
    assert!(!gw.send_inventory_update("", "restock", 5).await);

    let messages = gw.get_queue_messages(10).await;
    assert_eq!(messages.len(), 3);
    assert!(messages[0].starts_with('[') && messages[0].ends_with("UTC] [General] hello"));
    assert!(messages[1].ends_with("[ORDER_PROCESSING] Processing order #42 for customer 'Jane Smith' - Amount: $31999.98"));
    assert!(messages[2].ends_with("[INVENTORY_MANAGEMENT] Inventory restock: 5 units of 'Laptop'"));
}

#[tokio::test]
async fn images_round_trip() {
    let gw = local_gateway().await;
    let url = gw.upload_image("laptop.png", Bytes::from_static(b"\x89PNG"), "image/png").await;
    assert_eq!(url, "http://127.0.0.1:10000/devstoreaccount1/product-images/laptop.png");
    assert_eq!(url, gw.get_image_url("laptop.png"));

    let listed = gw.list_images().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content_type, "image/png");
    assert_eq!(gw.download_image("laptop.png").await, Download::Found(Bytes::from_static(b"\x89PNG")));

    assert!(gw.download_image("missing.png").await.is_empty());
    assert_eq!(gw.upload_image("../x.png", Bytes::new(), "image/png").await, "");

    assert!(gw.delete_image("laptop.png").await);
    assert!(gw.delete_image("laptop.png").await);
    assert!(gw.list_images().await.is_empty());

    let messages = gw.get_queue_messages(10).await;
    assert_eq!(messages, ["Image uploaded: laptop.png", "Image deleted: laptop.png", "Image deleted: laptop.png"]);
}

#[tokio::test]
async fn contract_files_round_trip() {
    let gw = local_gateway().await;
    assert!(gw.upload_file("acme.pdf", Bytes::from_static(b"%PDF")).await);
    assert_eq!(gw.list_files().await, ["acme.pdf"]);
    assert_eq!(gw.download_file("acme.pdf").await.into_bytes(), Bytes::from_static(b"%PDF"));
    assert!(gw.download_file("nope.pdf").await.is_empty());
    assert!(gw.delete_file("acme.pdf").await);
    assert!(gw.delete_file("acme.pdf").await);
    assert!(gw.list_files().await.is_empty());
    assert!(!gw.upload_file("a/b.pdf", Bytes::from_static(b"x")).await);
    assert_eq!(
        gw.get_queue_messages(10).await,
        ["Contract file uploaded: acme.pdf", "Contract file deleted: acme.pdf", "Contract file deleted: acme.pdf"]
    );
}

/// Every call fails, standing in for an unreachable service.
struct Unreachable;

fn down<T>() -> Result<T, StorageError> {
    Err(StorageError::Unavailable("connection refused".into()))
}

#[async_trait]
impl TableBackend for Unreachable {
    async fn create_table_if_not_exists(&self, _: &str) -> Result<(), StorageError> { down() }
    async fn insert(&self, _: &str, _: TableRow) -> Result<TableRow, StorageError> { down() }
    async fn get(&self, _: &str, _: &str, _: &str) -> Result<TableRow, StorageError> { down() }
    async fn query(&self, _: &str, _: Option<&str>) -> Result<Vec<TableRow>, StorageError> { down() }
    async fn update(&self, _: &str, _: TableRow, _: &str) -> Result<TableRow, StorageError> { down() }
    async fn delete(&self, _: &str, _: &str, _: &str, _: &str) -> Result<(), StorageError> { down() }
}

#[async_trait]
impl BlobBackend for Unreachable {
    async fn create_container_if_not_exists(&self, _: &str) -> Result<(), StorageError> { down() }
    async fn upload(&self, _: &str, _: &str, _: Bytes, _: &str) -> Result<BlobProperties, StorageError> { down() }
    async fn list(&self, _: &str) -> Result<Vec<BlobProperties>, StorageError> { down() }
    async fn download(&self, _: &str, _: &str) -> Result<Bytes, StorageError> { down() }
    async fn delete_if_exists(&self, _: &str, _: &str) -> Result<bool, StorageError> { down() }
}

#[async_trait]
impl QueueBackend for Unreachable {
    async fn create_queue_if_not_exists(&self, _: &str) -> Result<(), StorageError> { down() }
    async fn send(&self, _: &str, _: &str) -> Result<String, StorageError> { down() }
    async fn receive(&self, _: &str, _: Duration) -> Result<Option<ReceivedMessage>, StorageError> { down() }
    async fn peek(&self, _: &str, _: usize) -> Result<Vec<PeekedMessage>, StorageError> { down() }
    async fn delete_message(&self, _: &str, _: &str, _: &str) -> Result<(), StorageError> { down() }
}

#[async_trait]
impl FileShareBackend for Unreachable {
    async fn create_share_if_not_exists(&self, _: &str) -> Result<(), StorageError> { down() }
    async fn upload(&self, _: &str, _: &str, _: Bytes, _: u64) -> Result<ShareFileInfo, StorageError> { down() }
    async fn list(&self, _: &str) -> Result<Vec<ShareFileInfo>, StorageError> { down() }
    async fn download(&self, _: &str, _: &str) -> Result<Bytes, StorageError> { down() }
    async fn delete_if_exists(&self, _: &str, _: &str) -> Result<bool, StorageError> { down() }
}

fn names() -> StorageNames {
    StorageNames::from(&StorageConfig::default())
}

#[tokio::test]
async fn unreachable_backends_collapse_to_falsy() {
    let u = Arc::new(Unreachable);
    let gw = StorageGateway::new(u.clone(), u.clone(), u.clone(), u, names(), "http://x");
    // initialization failures are only logged
    gw.initialize().await;

    assert!(gw.add_customer_profile(jane()).await.is_none());
    assert!(gw.get_product("Product", "p").await.is_none());
    assert!(gw.list_orders().await.is_empty());
    assert!(!gw.update_order(&Order::new("c", "p", 1, 1.0)).await);
    assert!(!gw.delete_customer_profile("Customer", "c").await);
    assert!(gw.place_order("c", "p", 1, "").await.is_none());

    assert_eq!(gw.upload_image("a.png", Bytes::from_static(b"x"), "image/png").await, "");
    assert!(gw.list_images().await.is_empty());
    assert_eq!(gw.download_image("a.png").await, Download::Empty);
    assert!(!gw.delete_image("a.png").await);
    // the address needs no round-trip
    assert_eq!(gw.get_image_url("a.png"), "http://x/product-images/a.png");

    assert!(!gw.send_message("x").await);
    assert!(gw.receive_message().await.is_none());
    assert!(gw.get_queue_messages(10).await.is_empty());

    assert!(!gw.upload_file("a.pdf", Bytes::from_static(b"x")).await);
    assert!(gw.list_files().await.is_empty());
    assert!(gw.download_file("a.pdf").await.is_empty());
    assert!(!gw.delete_file("a.pdf").await);
}

#[tokio::test]
async fn queue_outage_does_not_fail_mutations() {
    let root = temp_root("gateway_no_queue");
    let local = LocalBackends::new(&root);
    let gw = StorageGateway::new(
        local.tables,
        local.blobs,
        Arc::new(Unreachable),
        local.files,
        names(),
        "http://x",
    );
    gw.initialize().await;

    let added = gw.add_customer_profile(jane()).await.unwrap();
    assert_eq!(added.partition_key, CustomerProfile::PARTITION);
    assert!(gw.delete_customer_profile("Customer", &added.row_key).await);
    assert!(gw.upload_file("c.pdf", Bytes::from_static(b"x")).await);
}
