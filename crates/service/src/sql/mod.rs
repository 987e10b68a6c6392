//! Relational data service over the `customers`, `products` and `orders` tables.
//!
//! Error policy:
//! - create returns `Result` and the caller handles the failure;
//! - reads, updates, deletes and aggregates log the error and return
//!   `None` / `false` / empty / zero.
//!
//! "Not found" on update or delete is a plain `None` / `false`.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use tracing::error;

use models::{customer, order, product};

use crate::observability;

mod customers;
mod orders;
mod products;
mod reports;


const BACKEND: &str = "relational";

/// A customer together with all of their orders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerWithOrders {
    pub customer: customer::Model,
    pub orders: Vec<order::Model>,
}

/// A product together with all orders placed for it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductWithOrders {
    pub product: product::Model,
    pub orders: Vec<order::Model>,
}

/// An order with both parents loaded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderDetails {
    pub order: order::Model,
    pub customer: Option<customer::Model>,
    pub product: Option<product::Model>,
}

#[derive(Clone)]
pub struct RetailDataService {
    db: Arc<DatabaseConnection>,
}

impl RetailDataService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Count the outcome, log a failure and turn it into `None`.
fn settle<T>(op: &'static str, entity: &'static str, res: Result<T, DbErr>) -> Option<T> {
    observability::record(BACKEND, op, res.is_ok());
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            error!(op, entity, error = %e, "relational operation failed");
            None
        }
    }
}
