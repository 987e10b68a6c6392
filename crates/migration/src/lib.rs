//! Migrator registering the retail tables in dependency order.
//! Indexes and seed rows are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_customers;
mod m20240101_000002_create_products;
mod m20240101_000003_create_orders;
mod m20240101_000004_add_indexes;
mod m20240101_000005_seed_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_customers::Migration),
            Box::new(m20240101_000002_create_products::Migration),
            Box::new(m20240101_000003_create_orders::Migration),
            // Indexes should always be applied after the tables
            Box::new(m20240101_000004_add_indexes::Migration),
            Box::new(m20240101_000005_seed_data::Migration),
        ]
    }
}
