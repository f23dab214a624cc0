//! Saved import mapping queries

use crate::db::models::{Mapping, MappingFieldRow};
use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Create a named mapping and return its id
pub async fn create_mapping(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO mapping (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_mapping_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Mapping>> {
    let mapping = sqlx::query_as::<_, Mapping>(
        "SELECT id, name, description, mapping_type FROM mapping WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(mapping)
}

/// Load every field row saved for a mapping
///
/// Rows come back in storage order; callers sort by column number.
pub async fn load_mapping_fields(pool: &SqlitePool, mapping_id: i64) -> Result<Vec<MappingFieldRow>> {
    let rows = sqlx::query_as::<_, MappingFieldRow>(
        r#"
        SELECT id, mapping_id, name, contact_type, column_number,
               location_type_id, phone_type_id, im_provider_id, website_type_id,
               relationship_type_id, relationship_direction
        FROM mapping_field
        WHERE mapping_id = ?
        ORDER BY id
        "#,
    )
    .bind(mapping_id)
    .fetch_all(pool)
    .await?;

    debug!("Loaded {} field rows for mapping {}", rows.len(), mapping_id);
    Ok(rows)
}

/// Replace the field rows of a mapping
///
/// `id` and `mapping_id` on the given rows are ignored.
pub async fn save_mapping_fields(
    pool: &SqlitePool,
    mapping_id: i64,
    fields: &[MappingFieldRow],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM mapping_field WHERE mapping_id = ?")
        .bind(mapping_id)
        .execute(&mut *tx)
        .await?;

    for field in fields {
        sqlx::query(
            r#"
            INSERT INTO mapping_field (
                mapping_id, name, contact_type, column_number,
                location_type_id, phone_type_id, im_provider_id, website_type_id,
                relationship_type_id, relationship_direction
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(mapping_id)
        .bind(&field.name)
        .bind(&field.contact_type)
        .bind(field.column_number)
        .bind(field.location_type_id)
        .bind(field.phone_type_id)
        .bind(field.im_provider_id)
        .bind(field.website_type_id)
        .bind(field.relationship_type_id)
        .bind(&field.relationship_direction)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    debug!("Saved {} field rows for mapping {}", fields.len(), mapping_id);
    Ok(())
}
