use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use tracing::{error, warn};

use models::{order, product};

use super::{settle, ProductWithOrders, RetailDataService};
use crate::errors::ServiceError;
use crate::observability;

impl RetailDataService {
    /// All products, ordered by name.
    pub async fn list_products(&self) -> Vec<product::Model> {
        let res = product::Entity::find()
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await;
        settle("list", "product", res).unwrap_or_default()
    }

    /// One product with the orders placed for it.
    pub async fn get_product(&self, id: i32) -> Option<ProductWithOrders> {
        let res = async {
            let Some(p) = product::Entity::find_by_id(id).one(&*self.db).await? else {
                return Ok(None);
            };
            let orders = p
                .find_related(order::Entity)
                .order_by_desc(order::Column::DateCreated)
                .all(&*self.db)
                .await?;
            Ok::<_, DbErr>(Some(ProductWithOrders { product: p, orders }))
        }
        .await;
        settle("get", "product", res).flatten()
    }

    pub async fn products_by_category(&self, category: &str) -> Vec<product::Model> {
        let res = product::Entity::find()
            .filter(product::Column::Category.eq(category))
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await;
        settle("list_by_category", "product", res).unwrap_or_default()
    }

    pub async fn create_product(&self, input: product::ProductInput) -> Result<product::Model, ServiceError> {
        let res = product::create(&*self.db, input).await;
        observability::record(super::BACKEND, "create", res.is_ok());
        res.map_err(|e| {
            error!(op = "create", entity = "product", error = %e, "relational operation failed");
            ServiceError::from(e)
        })
    }

    pub async fn update_product(&self, id: i32, input: product::ProductInput) -> Option<product::Model> {
        if let Err(e) = input.validate() {
            warn!(op = "update", entity = "product", id, error = %e, "invalid update rejected");
            return None;
        }
        let res = async {
            let Some(existing) = product::Entity::find_by_id(id).one(&*self.db).await? else {
                return Ok(None);
            };
            let updated = input.apply_to(existing, Utc::now().into()).update(&*self.db).await?;
            Ok::<_, DbErr>(Some(updated))
        }
        .await;
        settle("update", "product", res).flatten()
    }

    /// Physically remove product `id`. Fails while orders still reference it.
    pub async fn delete_product(&self, id: i32) -> bool {
        let res = product::Entity::delete_by_id(id).exec(&*self.db).await;
        settle("delete", "product", res).is_some_and(|r| r.rows_affected > 0)
    }
}
