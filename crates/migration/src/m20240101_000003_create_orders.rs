//! Create `orders` table.
//!
//! Both foreign keys are RESTRICT: a customer or product with orders
//! cannot be deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk_auto(Orders::OrderId))
                    .col(integer(Orders::CustomerId).not_null())
                    .col(integer(Orders::ProductId).not_null())
                    .col(integer(Orders::Quantity).not_null())
                    .col(decimal_len(Orders::UnitPrice, 18, 2).not_null())
                    .col(decimal_len(Orders::TotalAmount, 18, 2).not_null())
                    .col(string_len_null(Orders::Notes, 1000))
                    .col(string_len(Orders::Status, 30).not_null().default("New"))
                    .col(timestamp_with_time_zone(Orders::DateCreated).not_null())
                    .col(timestamp_with_time_zone_null(Orders::LastModified))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::CustomerId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_product")
                            .from(Orders::Table, Orders::ProductId)
                            .to(Products::Table, Products::ProductId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Orders::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    OrderId,
    CustomerId,
    ProductId,
    Quantity,
    UnitPrice,
    TotalAmount,
    Notes,
    Status,
    DateCreated,
    LastModified,
}

#[derive(DeriveIden)]
enum Customers { Table, CustomerId }

#[derive(DeriveIden)]
enum Products { Table, ProductId }
