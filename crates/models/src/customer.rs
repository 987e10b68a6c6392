use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, order, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
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

/// Caller-supplied customer fields. Also the update allow-list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
}

impl CustomerInput {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validation::required("first_name", &self.first_name, 50)?;
        validation::required("last_name", &self.last_name, 50)?;
        validation::email(&self.email)?;
        validation::phone(self.phone.as_deref())?;
        validation::required("address", &self.address, 200)?;
        Ok(())
    }

    /// Copy the allow-listed fields onto `existing`; id and creation time stay untouched.
    pub fn apply_to(self, existing: Model, now: DateTimeWithTimeZone) -> ActiveModel {
        let mut am: ActiveModel = existing.into();
        am.first_name = Set(self.first_name);
        am.last_name = Set(self.last_name);
        am.email = Set(self.email);
        am.phone = Set(self.phone);
        am.address = Set(self.address);
        am.last_modified = Set(Some(now));
        am
    }
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub async fn create(db: &DatabaseConnection, input: CustomerInput) -> Result<Model, errors::ModelError> {
    input.validate()?;
    let am = ActiveModel {
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        email: Set(input.email),
        phone: Set(input.phone),
        address: Set(input.address),
        date_created: Set(Utc::now().into()),
        last_modified: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
