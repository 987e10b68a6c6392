use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use models::{
    order::{self, OrderStatus},
    product,
};

use super::{settle, RetailDataService};

impl RetailDataService {
    /// Sum of `total_amount` over completed orders; zero when there are none
    /// or the query fails.
    pub async fn total_revenue(&self) -> Decimal {
        let res = order::Entity::find()
            .select_only()
            .column_as(order::Column::TotalAmount.sum(), "revenue")
            .filter(order::Column::Status.eq(OrderStatus::Completed.as_str()))
            .into_tuple::<Option<Decimal>>()
            .one(&*self.db)
            .await;
        settle("total_revenue", "order", res).flatten().flatten().unwrap_or(Decimal::ZERO)
    }

    pub async fn total_order_count(&self) -> u64 {
        let res = order::Entity::find().count(&*self.db).await;
        settle("count", "order", res).unwrap_or(0)
    }

    /// Products with `stock_quantity <= threshold`, lowest stock first.
    /// Callers without a preference pass [`product::DEFAULT_LOW_STOCK_THRESHOLD`].
    pub async fn low_stock_products(&self, threshold: i32) -> Vec<product::Model> {
        let res = product::Entity::find()
            .filter(product::Column::StockQuantity.lte(threshold))
            .order_by_asc(product::Column::StockQuantity)
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await;
        settle("low_stock", "product", res).unwrap_or_default()
    }
}
