use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, sea_query::ForeignKeyAction, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{customer, errors, product, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub order_id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub status: String,
    pub date_created: DateTimeWithTimeZone,
    pub last_modified: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Customer, Product }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::CustomerId)
                .on_delete(ForeignKeyAction::Restrict)
                .into(),
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::ProductId)
                .on_delete(ForeignKeyAction::Restrict)
                .into(),
        }
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Well-known status values. The column itself accepts any string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    New,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `unit_price × quantity`, rounded to the column scale. Fails when the
/// product overflows or does not fit `decimal(18,2)`.
pub fn compute_total(unit_price: Decimal, quantity: i32) -> Result<Decimal, errors::ModelError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .map(|total| total.round_dp(2))
        .filter(|total| *total <= validation::money_max())
        .ok_or_else(|| errors::ModelError::Validation("total_amount exceeds the column range".into()))
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
    /// `None` means `New` on create and "keep current" on update.
    pub status: Option<String>,
}

impl OrderInput {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validation::at_least("quantity", self.quantity, 1)?;
        validation::money("unit_price", self.unit_price)?;
        compute_total(self.unit_price, self.quantity)?;
        validation::optional("notes", self.notes.as_deref(), 1000)?;
        if let Some(s) = &self.status {
            validation::required("status", s, 30)?;
        }
        Ok(())
    }

    /// Quantity, unit price, notes and status are copied; the total is recomputed.
    /// Customer and product links are not part of the allow-list.
    pub fn apply_to(self, existing: Model, now: DateTimeWithTimeZone) -> Result<ActiveModel, errors::ModelError> {
        let total = compute_total(self.unit_price, self.quantity)?;
        let mut am: ActiveModel = existing.into();
        am.quantity = Set(self.quantity);
        am.unit_price = Set(self.unit_price);
        am.total_amount = Set(total);
        am.notes = Set(self.notes);
        if let Some(status) = self.status {
            am.status = Set(status);
        }
        am.last_modified = Set(Some(now));
        Ok(am)
    }
}

pub async fn create(db: &DatabaseConnection, input: OrderInput) -> Result<Model, errors::ModelError> {
    input.validate()?;
    let total = compute_total(input.unit_price, input.quantity)?;
    let am = ActiveModel {
        customer_id: Set(input.customer_id),
        product_id: Set(input.product_id),
        quantity: Set(input.quantity),
        unit_price: Set(input.unit_price),
        total_amount: Set(total),
        notes: Set(input.notes),
        status: Set(input.status.unwrap_or_else(|| OrderStatus::New.as_str().to_string())),
        date_created: Set(Utc::now().into()),
        last_modified: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
