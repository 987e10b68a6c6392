use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, LoaderTrait, QueryFilter, QueryOrder, Select,
};
use tracing::{error, warn};

use models::{customer, order, product};

use super::{settle, OrderDetails, RetailDataService};
use crate::errors::ServiceError;
use crate::observability;

impl RetailDataService {
    /// Run `select` newest first and attach both parents to every order.
    async fn load_details(&self, select: Select<order::Entity>) -> Result<Vec<OrderDetails>, DbErr> {
        let orders = select
            .order_by_desc(order::Column::DateCreated)
            .order_by_desc(order::Column::OrderId)
            .all(&*self.db)
            .await?;
        let customers = orders.load_one(customer::Entity, &*self.db).await?;
        let products = orders.load_one(product::Entity, &*self.db).await?;
        Ok(orders
            .into_iter()
            .zip(customers)
            .zip(products)
            .map(|((order, customer), product)| OrderDetails { order, customer, product })
            .collect())
    }

    /// All orders with customer and product, newest first.
    pub async fn list_orders(&self) -> Vec<OrderDetails> {
        let res = self.load_details(order::Entity::find()).await;
        settle("list", "order", res).unwrap_or_default()
    }

    pub async fn get_order(&self, id: i32) -> Option<OrderDetails> {
        let res = self
            .load_details(order::Entity::find_by_id(id))
            .await
            .map(|v| v.into_iter().next());
        settle("get", "order", res).flatten()
    }

    pub async fn orders_by_customer(&self, customer_id: i32) -> Vec<OrderDetails> {
        let res = self
            .load_details(order::Entity::find().filter(order::Column::CustomerId.eq(customer_id)))
            .await;
        settle("list_by_customer", "order", res).unwrap_or_default()
    }

    pub async fn orders_by_product(&self, product_id: i32) -> Vec<OrderDetails> {
        let res = self
            .load_details(order::Entity::find().filter(order::Column::ProductId.eq(product_id)))
            .await;
        settle("list_by_product", "order", res).unwrap_or_default()
    }

    /// Insert an order. The total is `unit_price × quantity` whatever the
    /// caller sent; a missing customer or product surfaces as an error.
    pub async fn create_order(&self, input: order::OrderInput) -> Result<order::Model, ServiceError> {
        let res = order::create(&*self.db, input).await;
        observability::record(super::BACKEND, "create", res.is_ok());
        res.map_err(|e| {
            error!(op = "create", entity = "order", error = %e, "relational operation failed");
            ServiceError::from(e)
        })
    }

    /// Copy quantity, unit price, notes and status onto order `id` and
    /// recompute the total. Customer and product links are kept.
    pub async fn update_order(&self, id: i32, input: order::OrderInput) -> Option<order::Model> {
        if let Err(e) = input.validate() {
            warn!(op = "update", entity = "order", id, error = %e, "invalid update rejected");
            return None;
        }
        let res = async {
            let Some(existing) = order::Entity::find_by_id(id).one(&*self.db).await? else {
                return Ok(None);
            };
            let am = input
                .apply_to(existing, Utc::now().into())
                .map_err(|e| DbErr::Custom(e.to_string()))?;
            let updated = am.update(&*self.db).await?;
            Ok::<_, DbErr>(Some(updated))
        }
        .await;
        settle("update", "order", res).flatten()
    }

    pub async fn delete_order(&self, id: i32) -> bool {
        let res = order::Entity::delete_by_id(id).exec(&*self.db).await;
        settle("delete", "order", res).is_some_and(|r| r.rows_affected > 0)
    }
}
