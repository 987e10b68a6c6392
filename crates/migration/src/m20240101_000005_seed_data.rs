//! Seed two customers and two products.
//!
//! Ids come from the serial sequences so later inserts do not collide.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let customers = Query::insert()
            .into_table(Customers::Table)
            .columns([
                Customers::FirstName,
                Customers::LastName,
                Customers::Email,
                Customers::Phone,
                Customers::Address,
                Customers::DateCreated,
            ])
            .values_panic([
                "John".into(),
                "Doe".into(),
                "john.doe@example.com".into(),
                "0821234567".into(),
                "123 Main St, Johannesburg, 2000".into(),
                Expr::current_timestamp().into(),
            ])
            .values_panic([
                "Jane".into(),
                "Smith".into(),
                "jane.smith@example.com".into(),
                "0827654321".into(),
                "456 Oak Ave, Cape Town, 8001".into(),
                Expr::current_timestamp().into(),
            ])
            .to_owned();
        manager.exec_stmt(customers).await?;

        // numeric 字面量直接写入，避免浮点误差
        let products = Query::insert()
            .into_table(Products::Table)
            .columns([
                Products::Name,
                Products::Description,
                Products::Price,
                Products::Category,
                Products::StockQuantity,
                Products::DateCreated,
            ])
            .values_panic([
                "Laptop".into(),
                "High-performance laptop for professionals".into(),
                Expr::cust("15999.99"),
                "Electronics".into(),
                50i32.into(),
                Expr::current_timestamp().into(),
            ])
            .values_panic([
                "Office Chair".into(),
                "Ergonomic office chair with lumbar support".into(),
                Expr::cust("2499.99"),
                "Furniture".into(),
                100i32.into(),
                Expr::current_timestamp().into(),
            ])
            .to_owned();
        manager.exec_stmt(products).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let products = Query::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::Name).is_in(["Laptop", "Office Chair"]))
            .to_owned();
        manager.exec_stmt(products).await?;

        let customers = Query::delete()
            .from_table(Customers::Table)
            .and_where(
                Expr::col(Customers::Email)
                    .is_in(["john.doe@example.com", "jane.smith@example.com"]),
            )
            .to_owned();
        manager.exec_stmt(customers).await
    }
}

#[derive(DeriveIden)]
enum Customers { Table, FirstName, LastName, Email, Phone, Address, DateCreated }

#[derive(DeriveIden)]
enum Products { Table, Name, Description, Price, Category, StockQuantity, DateCreated }
