//! Create `products` table. Price is numeric(18,2).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::ProductId))
                    .col(string_len(Products::Name, 100).not_null())
                    .col(string_len(Products::Description, 500).not_null())
                    .col(decimal_len(Products::Price, 18, 2).not_null())
                    .col(string_len(Products::Category, 100).not_null())
                    .col(integer(Products::StockQuantity).not_null())
                    .col(string_len_null(Products::ImageUrl, 500))
                    .col(timestamp_with_time_zone(Products::DateCreated).not_null())
                    .col(timestamp_with_time_zone_null(Products::LastModified))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Products::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    ProductId,
    Name,
    Description,
    Price,
    Category,
    StockQuantity,
    ImageUrl,
    DateCreated,
    LastModified,
}
