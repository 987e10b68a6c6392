use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, DatabaseBackend, MockDatabase};

use crate::{customer, errors::ModelError, order, product};

fn sample_customer() -> customer::Model {
    customer::Model {
        customer_id: 7,
        first_name: "John".into(),
        last_name: "Doe".into(),
        email: "john.doe@example.com".into(),
        phone: Some("0821234567".into()),
        address: "123 Main St".into(),
        date_created: Utc::now().into(),
        last_modified: None,
    }
}

fn sample_order() -> order::Model {
    order::Model {
        order_id: 3,
        customer_id: 1,
        product_id: 2,
        quantity: 1,
        unit_price: Decimal::new(249999, 2),
        total_amount: Decimal::new(249999, 2),
        notes: None,
        status: "New".into(),
        date_created: Utc::now().into(),
        last_modified: None,
    }
}

#[test]
fn customer_update_copies_allow_list_only() {
    let existing = sample_customer();
    let created = existing.date_created;
    let input = customer::CustomerInput {
        first_name: "Johnny".into(),
        last_name: "Doe".into(),
        email: "johnny@example.com".into(),
        phone: None,
        address: "9 Side St".into(),
    };
    let am = input.apply_to(existing, Utc::now().into());
    assert!(matches!(am.customer_id, ActiveValue::Unchanged(7)));
    assert!(matches!(am.date_created, ActiveValue::Unchanged(d) if d == created));
    assert!(am.first_name.is_set());
    assert!(am.email.is_set());
    assert!(matches!(am.last_modified, ActiveValue::Set(Some(_))));
}

#[test]
fn order_update_recomputes_total_and_keeps_links() {
    let existing = sample_order();
    let input = order::OrderInput {
        customer_id: 99,
        product_id: 98,
        quantity: 4,
        unit_price: Decimal::new(1050, 2),
        notes: Some("rush".into()),
        status: Some("Processing".into()),
    };
    let am = input.apply_to(existing, Utc::now().into()).unwrap();
    assert!(matches!(am.customer_id, ActiveValue::Unchanged(1)));
    assert!(matches!(am.product_id, ActiveValue::Unchanged(2)));
    assert_eq!(am.total_amount, ActiveValue::Set(Decimal::new(4200, 2)));
    assert_eq!(am.status, ActiveValue::Set("Processing".to_string()));
}

#[test]
fn order_update_without_status_keeps_current() {
    let input = order::OrderInput { quantity: 1, unit_price: Decimal::ONE, ..Default::default() };
    let am = input.apply_to(sample_order(), Utc::now().into()).unwrap();
    assert!(matches!(am.status, ActiveValue::Unchanged(ref s) if s == "New"));
}

#[test]
fn compute_total_rounds_to_cents() {
    assert_eq!(order::compute_total(Decimal::new(1599999, 2), 2).unwrap(), Decimal::new(3199998, 2));
    assert_eq!(order::compute_total(Decimal::new(3333, 3), 3).unwrap(), Decimal::new(1000, 2));
}

#[test]
fn oversized_totals_fail_validation() {
    assert!(matches!(order::compute_total(Decimal::MAX, 2), Err(ModelError::Validation(_))));
    // each factor fits, the product does not
    let input = order::OrderInput {
        quantity: 1000,
        unit_price: Decimal::new(99_999_999_999_999_999, 2),
        ..Default::default()
    };
    assert!(matches!(input.validate(), Err(ModelError::Validation(_))));
    let input = order::OrderInput { quantity: 2, unit_price: Decimal::MAX, ..Default::default() };
    assert!(matches!(input.validate(), Err(ModelError::Validation(_))));
}

#[test]
fn status_names() {
    assert_eq!(order::OrderStatus::Completed.as_str(), "Completed");
    assert_eq!(order::OrderStatus::Cancelled.to_string(), "Cancelled");
}

#[tokio::test]
async fn create_customer_returns_inserted_row() {
    let row = sample_customer();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();
    let input = customer::CustomerInput {
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        email: row.email.clone(),
        phone: row.phone.clone(),
        address: row.address.clone(),
    };
    let created = customer::create(&db, input).await.unwrap();
    assert_eq!(created.customer_id, 7);
}

#[tokio::test]
async fn invalid_input_never_reaches_db() {
    // no results appended: any query would fail with a mock error, not a validation error
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let err = product::create(
        &db,
        product::ProductInput {
            name: "".into(),
            description: "d".into(),
            price: Decimal::ONE,
            category: "c".into(),
            stock_quantity: 1,
            image_url: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));

    let err = order::create(&db, order::OrderInput { quantity: 0, ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}
