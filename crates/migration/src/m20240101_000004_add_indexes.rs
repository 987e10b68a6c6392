use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Orders: lookups by customer / product, newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_customer")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_product")
                    .table(Orders::Table)
                    .col(Orders::ProductId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_date_created")
                    .table(Orders::Table)
                    .col(Orders::DateCreated)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_orders_customer").table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_product").table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_date_created").table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders { Table, CustomerId, ProductId, DateCreated }
