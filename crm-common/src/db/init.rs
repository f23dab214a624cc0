//! Database initialization
//!
//! Opens (or creates on first run) the SQLite database and makes sure every
//! table exists. Table creation is idempotent.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    create_mapping_table(&pool).await?;
    create_mapping_field_table(&pool).await?;
    create_price_set_table(&pool).await?;
    create_price_field_table(&pool).await?;
    create_price_field_value_table(&pool).await?;

    Ok(pool)
}

async fn create_mapping_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mapping (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            mapping_type TEXT NOT NULL DEFAULT 'Import Contact'
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_mapping_field_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mapping_field (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mapping_id INTEGER NOT NULL REFERENCES mapping(id) ON DELETE CASCADE,
            name TEXT NOT NULL DEFAULT '',
            contact_type TEXT,
            column_number INTEGER NOT NULL,
            location_type_id INTEGER,
            phone_type_id INTEGER,
            im_provider_id INTEGER,
            website_type_id INTEGER,
            relationship_type_id INTEGER,
            relationship_direction TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_mapping_field_mapping ON mapping_field(mapping_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_price_set_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS price_set (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_price_field_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS price_field (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            price_set_id INTEGER NOT NULL REFERENCES price_set(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            label TEXT NOT NULL,
            html_type TEXT NOT NULL,
            weight INTEGER NOT NULL DEFAULT 1,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_price_field_value_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS price_field_value (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            price_field_id INTEGER NOT NULL REFERENCES price_field(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            label TEXT NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            tax_rate REAL,
            weight INTEGER NOT NULL DEFAULT 1,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
