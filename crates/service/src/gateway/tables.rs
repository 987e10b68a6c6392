use tracing::{error, info};

use models::table::{new_row_key, CustomerProfile, Order, Product, TableEntity, TableRow, ETAG_ANY};

use super::{notifications, settle, StorageGateway};
use crate::errors::StorageError;

const BACKEND: &str = "table";

impl StorageGateway {
    async fn add_entity<T: TableEntity>(&self, table: &str, mut entity: T) -> Option<T> {
        entity.assign_keys(new_row_key());
        let row_key = entity.row_key().to_string();
        let res = async {
            let row = TableRow::from_entity(&entity)?;
            let stored = self.tables.insert(table, row).await?;
            Ok::<T, StorageError>(stored.into_entity()?)
        }
        .await
        .inspect_err(|e| {
            error!(op = "add", table, partition_key = T::PARTITION, row_key = %row_key, error = %e, "table operation failed")
        });
        settle(BACKEND, "add", res)
    }

    async fn get_entity<T: TableEntity>(&self, table: &str, partition_key: &str, row_key: &str) -> Option<T> {
        let res = async {
            let row = self.tables.get(table, partition_key, row_key).await?;
            Ok::<T, StorageError>(row.into_entity()?)
        }
        .await
        .inspect_err(|e| {
            error!(op = "get", table, partition_key, row_key, error = %e, "table operation failed")
        });
        settle(BACKEND, "get", res)
    }

    async fn list_entities<T: TableEntity>(&self, table: &str) -> Vec<T> {
        let res = async {
            let rows = self.tables.query(table, None).await?;
            rows.into_iter()
                .map(|r| r.into_entity::<T>().map_err(StorageError::from))
                .collect::<Result<Vec<T>, StorageError>>()
        }
        .await
        .inspect_err(|e| error!(op = "list", table, error = %e, "table operation failed"));
        settle(BACKEND, "list", res).unwrap_or_default()
    }

    /// Replace the stored row if the entity's ETag is still current.
    async fn update_entity<T: TableEntity>(&self, table: &str, entity: &T) -> Option<T> {
        let res = async {
            let row = TableRow::from_entity(entity)?;
            let stored = self.tables.update(table, row, entity.etag()).await?;
            Ok::<T, StorageError>(stored.into_entity()?)
        }
        .await
        .inspect_err(|e| {
            error!(op = "update", table, row_key = entity.row_key(), error = %e, "table operation failed")
        });
        settle(BACKEND, "update", res)
    }

    async fn delete_entity(&self, table: &str, partition_key: &str, row_key: &str) -> bool {
        let res = self
            .tables
            .delete(table, partition_key, row_key, ETAG_ANY)
            .await
            .inspect_err(|e| {
                error!(op = "delete", table, partition_key, row_key, error = %e, "table operation failed")
            });
        settle(BACKEND, "delete", res).is_some()
    }

    // ---- customers ----

    pub async fn add_customer_profile(&self, customer: CustomerProfile) -> Option<CustomerProfile> {
        let stored = self.add_entity(&self.names.customer_table, customer).await?;
        self.notify(notifications::customer_created(&stored)).await;
        Some(stored)
    }

    pub async fn get_customer_profile(&self, partition_key: &str, row_key: &str) -> Option<CustomerProfile> {
        self.get_entity(&self.names.customer_table, partition_key, row_key).await
    }

    pub async fn list_customer_profiles(&self) -> Vec<CustomerProfile> {
        self.list_entities(&self.names.customer_table).await
    }

    pub async fn update_customer_profile(&self, customer: &CustomerProfile) -> bool {
        match self.update_entity(&self.names.customer_table, customer).await {
            Some(stored) => {
                self.notify(notifications::customer_updated(&stored)).await;
                true
            }
            None => false,
        }
    }

    pub async fn delete_customer_profile(&self, partition_key: &str, row_key: &str) -> bool {
        let ok = self.delete_entity(&self.names.customer_table, partition_key, row_key).await;
        if ok {
            self.notify(notifications::deleted(CustomerProfile::KIND, row_key)).await;
        }
        ok
    }

    // ---- products ----

    pub async fn add_product(&self, product: Product) -> Option<Product> {
        let stored = self.add_entity(&self.names.product_table, product).await?;
        self.notify(notifications::product_created(&stored)).await;
        Some(stored)
    }

    pub async fn get_product(&self, partition_key: &str, row_key: &str) -> Option<Product> {
        self.get_entity(&self.names.product_table, partition_key, row_key).await
    }

    pub async fn list_products(&self) -> Vec<Product> {
        self.list_entities(&self.names.product_table).await
    }

    pub async fn update_product(&self, product: &Product) -> bool {
        match self.update_entity(&self.names.product_table, product).await {
            Some(stored) => {
                self.notify(notifications::product_updated(&stored)).await;
                true
            }
            None => false,
        }
    }

    pub async fn delete_product(&self, partition_key: &str, row_key: &str) -> bool {
        let ok = self.delete_entity(&self.names.product_table, partition_key, row_key).await;
        if ok {
            self.notify(notifications::deleted(Product::KIND, row_key)).await;
        }
        ok
    }

    // ---- orders ----

    /// Insert an order. The total is recomputed from unit price and quantity.
    pub async fn add_order(&self, mut order: Order) -> Option<Order> {
        order.compute_total();
        let stored = self.add_entity(&self.names.order_table, order).await?;
        self.notify(notifications::order_created(&stored)).await;
        Some(stored)
    }

    pub async fn get_order(&self, partition_key: &str, row_key: &str) -> Option<Order> {
        self.get_entity(&self.names.order_table, partition_key, row_key).await
    }

    pub async fn list_orders(&self) -> Vec<Order> {
        self.list_entities(&self.names.order_table).await
    }

    pub async fn update_order(&self, order: &Order) -> bool {
        let mut order = order.clone();
        order.compute_total();
        match self.update_entity(&self.names.order_table, &order).await {
            Some(stored) => {
                self.notify(notifications::order_updated(&stored)).await;
                true
            }
            None => false,
        }
    }

    pub async fn delete_order(&self, partition_key: &str, row_key: &str) -> bool {
        let ok = self.delete_entity(&self.names.order_table, partition_key, row_key).await;
        if ok {
            self.notify(notifications::deleted(Order::KIND, row_key)).await;
        }
        ok
    }

    /// Create an order for an existing customer and product, capturing their
    /// names and the current product price.
    pub async fn place_order(
        &self,
        customer_row_key: &str,
        product_row_key: &str,
        quantity: i32,
        notes: &str,
    ) -> Option<Order> {
        if quantity <= 0 {
            info!(quantity, "order rejected: quantity must be positive");
            return None;
        }
        let Some(customer) = self.get_customer_profile(CustomerProfile::PARTITION, customer_row_key).await else {
            info!(customer_row_key, "order rejected: customer not found");
            return None;
        };
        let Some(product) = self.get_product(Product::PARTITION, product_row_key).await else {
            info!(product_row_key, "order rejected: product not found");
            return None;
        };

        let mut order = Order::new(customer_row_key, product_row_key, quantity, product.price);
        order.customer_name = customer.full_name();
        order.product_name = product.name.clone();
        order.notes = notes.to_string();
        self.add_order(order).await
    }
}
