use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, order, validation};

/// Default threshold of the low-stock report.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub product_id: i32,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    pub category: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub date_created: DateTimeWithTimeZone,
    pub last_modified: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Orders }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Orders => Entity::has_many(order::Entity).into(),
        }
    }
}

impl Related<order::Entity> for Entity {
    fn to() -> RelationDef { Relation::Orders.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validation::required("name", &self.name, 100)?;
        validation::required("description", &self.description, 500)?;
        validation::money("price", self.price)?;
        validation::required("category", &self.category, 100)?;
        validation::at_least("stock_quantity", self.stock_quantity, 0)?;
        validation::url("image_url", self.image_url.as_deref(), 500)?;
        Ok(())
    }

    pub fn apply_to(self, existing: Model, now: DateTimeWithTimeZone) -> ActiveModel {
        let mut am: ActiveModel = existing.into();
        am.name = Set(self.name);
        am.description = Set(self.description);
        am.price = Set(self.price);
        am.category = Set(self.category);
        am.stock_quantity = Set(self.stock_quantity);
        am.image_url = Set(self.image_url);
        am.last_modified = Set(Some(now));
        am
    }
}

pub async fn create(db: &DatabaseConnection, input: ProductInput) -> Result<Model, errors::ModelError> {
    input.validate()?;
    let am = ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price),
        category: Set(input.category),
        stock_quantity: Set(input.stock_quantity),
        image_url: Set(input.image_url),
        date_created: Set(Utc::now().into()),
        last_modified: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
