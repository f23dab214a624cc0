//! Price set, price field and price option queries

use crate::db::models::{PriceFieldRow, PriceFieldValueRow};
use crate::Result;
use sqlx::SqlitePool;

pub async fn create_price_set(pool: &SqlitePool, name: &str, title: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO price_set (name, title) VALUES (?, ?)")
        .bind(name)
        .bind(title)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Create a price field; `html_type` is stored verbatim (e.g. "Text", "Radio")
pub async fn create_price_field(
    pool: &SqlitePool,
    price_set_id: i64,
    label: &str,
    html_type: &str,
    weight: i64,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO price_field (price_set_id, name, label, html_type, weight) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(price_set_id)
    .bind(machine_name(label))
    .bind(label)
    .bind(html_type)
    .bind(weight)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn create_price_field_value(
    pool: &SqlitePool,
    price_field_id: i64,
    label: &str,
    amount: f64,
    tax_rate: Option<f64>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO price_field_value (price_field_id, name, label, amount, tax_rate, weight)
        VALUES (?, ?, ?, ?, ?,
            (SELECT COALESCE(MAX(weight), 0) + 1 FROM price_field_value WHERE price_field_id = ?))
        "#,
    )
    .bind(price_field_id)
    .bind(machine_name(label))
    .bind(label)
    .bind(amount)
    .bind(tax_rate)
    .bind(price_field_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All active price fields of active price sets
pub async fn load_price_fields(pool: &SqlitePool) -> Result<Vec<PriceFieldRow>> {
    let rows = sqlx::query_as::<_, PriceFieldRow>(
        r#"
        SELECT f.id, f.price_set_id, f.name, f.label, f.html_type, f.weight, f.is_active
        FROM price_field f
        JOIN price_set s ON s.id = f.price_set_id
        WHERE f.is_active = 1 AND s.is_active = 1
        ORDER BY f.weight, f.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All active price options, grouped by field in weight order
pub async fn load_price_field_values(pool: &SqlitePool) -> Result<Vec<PriceFieldValueRow>> {
    let rows = sqlx::query_as::<_, PriceFieldValueRow>(
        r#"
        SELECT id, price_field_id, name, label, amount, tax_rate, weight, is_active
        FROM price_field_value
        WHERE is_active = 1
        ORDER BY price_field_id, weight, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn machine_name(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}
