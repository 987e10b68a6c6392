//! Create `customers` table.
//!
//! Email is unique; orders reference this table with restrict delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::CustomerId))
                    .col(string_len(Customers::FirstName, 50).not_null())
                    .col(string_len(Customers::LastName, 50).not_null())
                    .col(string_len(Customers::Email, 100).unique_key().not_null())
                    .col(string_len_null(Customers::Phone, 20))
                    .col(string_len(Customers::Address, 200).not_null())
                    .col(timestamp_with_time_zone(Customers::DateCreated).not_null())
                    .col(timestamp_with_time_zone_null(Customers::LastModified))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    CustomerId,
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    DateCreated,
    LastModified,
}
