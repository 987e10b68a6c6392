use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use tracing::{error, warn};

use models::{customer, order};

use super::{settle, CustomerWithOrders, RetailDataService};
use crate::errors::ServiceError;
use crate::observability;

impl RetailDataService {
    /// All customers, ordered by last name then first name.
    pub async fn list_customers(&self) -> Vec<customer::Model> {
        let res = customer::Entity::find()
            .order_by_asc(customer::Column::LastName)
            .order_by_asc(customer::Column::FirstName)
            .all(&*self.db)
            .await;
        settle("list", "customer", res).unwrap_or_default()
    }

    /// One customer with their orders.
    pub async fn get_customer(&self, id: i32) -> Option<CustomerWithOrders> {
        let res = async {
            let Some(c) = customer::Entity::find_by_id(id).one(&*self.db).await? else {
                return Ok(None);
            };
            let orders = c
                .find_related(order::Entity)
                .order_by_desc(order::Column::DateCreated)
                .all(&*self.db)
                .await?;
            Ok::<_, DbErr>(Some(CustomerWithOrders { customer: c, orders }))
        }
        .await;
        settle("get", "customer", res).flatten()
    }

    pub async fn get_customer_by_email(&self, email: &str) -> Option<customer::Model> {
        let res = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&*self.db)
            .await;
        settle("get_by_email", "customer", res).flatten()
    }

    /// Insert a customer. Failures are returned, not swallowed.
    pub async fn create_customer(&self, input: customer::CustomerInput) -> Result<customer::Model, ServiceError> {
        let res = customer::create(&*self.db, input).await;
        observability::record(super::BACKEND, "create", res.is_ok());
        res.map_err(|e| {
            error!(op = "create", entity = "customer", error = %e, "relational operation failed");
            ServiceError::from(e)
        })
    }

    /// Copy the allow-listed fields onto customer `id`. `None` when the
    /// customer does not exist, the input is invalid or the write fails.
    pub async fn update_customer(&self, id: i32, input: customer::CustomerInput) -> Option<customer::Model> {
        if let Err(e) = input.validate() {
            warn!(op = "update", entity = "customer", id, error = %e, "invalid update rejected");
            return None;
        }
        let res = async {
            let Some(existing) = customer::Entity::find_by_id(id).one(&*self.db).await? else {
                return Ok(None);
            };
            let updated = input.apply_to(existing, Utc::now().into()).update(&*self.db).await?;
            Ok::<_, DbErr>(Some(updated))
        }
        .await;
        settle("update", "customer", res).flatten()
    }

    /// Physically remove customer `id`. Fails while orders still reference it.
    pub async fn delete_customer(&self, id: i32) -> bool {
        let res = customer::Entity::delete_by_id(id).exec(&*self.db).await;
        settle("delete", "customer", res).is_some_and(|r| r.rows_affected > 0)
    }
}
