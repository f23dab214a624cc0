//! Pricing orders against a price field catalog stored in SQLite

use crm_common::db::{create_price_field, create_price_field_value, create_price_set, init_database};
use crm_financial::{HtmlType, Order, PriceFieldStore, PriceSetCalculator};
use serde_json::json;
use sqlx::SqlitePool;

struct Catalog {
    pool: SqlitePool,
    level: i64,
    student: i64,
    tickets: i64,
    extras: i64,
    lunch: i64,
}

async fn seeded_catalog(dir: &tempfile::TempDir) -> Catalog {
    let pool = init_database(&dir.path().join("crm.db")).await.unwrap();
    let set_id = create_price_set(&pool, "conference", "Conference").await.unwrap();

    let level = create_price_field(&pool, set_id, "Registration Level", "Radio", 1)
        .await
        .unwrap();
    let student = create_price_field_value(&pool, level, "Student", 40.0, None)
        .await
        .unwrap();
    create_price_field_value(&pool, level, "Professional", 120.0, Some(20.0))
        .await
        .unwrap();

    let tickets = create_price_field(&pool, set_id, "Guest Tickets", "Text", 2)
        .await
        .unwrap();
    create_price_field_value(&pool, tickets, "Guest Tickets", 15.0, Some(10.0))
        .await
        .unwrap();

    let extras = create_price_field(&pool, set_id, "Extras", "CheckBox", 3)
        .await
        .unwrap();
    let lunch = create_price_field_value(&pool, extras, "Lunch", 12.0, None)
        .await
        .unwrap();
    create_price_field_value(&pool, extras, "Workshop", 60.0, None)
        .await
        .unwrap();

    Catalog {
        pool,
        level,
        student,
        tickets,
        extras,
        lunch,
    }
}

#[tokio::test]
async fn test_catalog_loaded_from_database() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = seeded_catalog(&dir).await;

    let fields = catalog.pool.price_fields().await.unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].id, catalog.level);
    assert_eq!(fields[0].html_type, HtmlType::Radio);
    assert_eq!(fields[0].options.len(), 2);
    assert_eq!(fields[0].options[0].id, catalog.student);
    assert_eq!(fields[2].options[1].label, "Workshop");
}

#[tokio::test]
async fn test_total_amount_from_form_input() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = seeded_catalog(&dir).await;

    let mut order = Order::new();
    order.set_price_selection_from_unfiltered_input(vec![
        (format!("price_{}", catalog.level), json!(catalog.student)),
        (format!("price_{}", catalog.tickets), json!("2")),
        (format!("price_{}", catalog.extras), json!({ (catalog.lunch.to_string()): 1 })),
        ("first_name".to_string(), json!("Ada")),
        ("qfKey".to_string(), json!("abc123")),
    ]);
    assert_eq!(order.price_options().len(), 3);

    let priced = order.priced(&catalog.pool, &PriceSetCalculator).await.unwrap();
    assert_eq!(priced.line_items.len(), 3);
    // 40 + (2 * 15 + 10% tax) + 12
    assert_eq!(priced.tax_amount, 3.0);
    assert_eq!(priced.amount, 85.0);

    let total = order.total_amount(&catalog.pool, &PriceSetCalculator).await.unwrap();
    assert_eq!(total, 85.0);
}

#[tokio::test]
async fn test_unselected_order_totals_zero() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = seeded_catalog(&dir).await;

    let order = Order::new();
    let total = order.total_amount(&catalog.pool, &PriceSetCalculator).await.unwrap();
    assert_eq!(total, 0.0);
}

#[tokio::test]
async fn test_closed_pool_fails_total() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = seeded_catalog(&dir).await;
    catalog.pool.close().await;

    let mut order = Order::new();
    order.set_price_selection_from_unfiltered_input(vec![("price_1", json!(1))]);
    let err = order
        .total_amount(&catalog.pool, &PriceSetCalculator)
        .await
        .unwrap_err();
    assert!(matches!(err, crm_common::Error::Database(_)));
}
