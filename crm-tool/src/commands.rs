//! Subcommand implementations

use anyhow::{bail, Context, Result};
use crm_common::db::{self, MappingFieldRow};
use crm_financial::{Order, PriceSetCalculator};
use crm_import::{ContactType, FieldCatalog, ImportProcessor};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub async fn save_mapping(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    fields_path: &Path,
) -> Result<i64> {
    let content = std::fs::read_to_string(fields_path)
        .with_context(|| format!("Failed to read {}", fields_path.display()))?;
    let rows: Vec<MappingFieldRow> =
        serde_json::from_str(&content).context("Mapping fields must be a JSON array of rows")?;

    let mapping_id = match db::find_mapping_by_name(pool, name).await? {
        Some(existing) => existing.id,
        None => db::create_mapping(pool, name, description).await?,
    };
    db::save_mapping_fields(pool, mapping_id, &rows).await?;

    info!("Saved {} fields to mapping '{}' ({})", rows.len(), name, mapping_id);
    Ok(mapping_id)
}

pub async fn show_mapping(
    pool: &SqlitePool,
    mapping_id: i64,
    metadata_path: Option<&Path>,
    contact_type: Option<&str>,
) -> Result<String> {
    let metadata = match metadata_path {
        Some(path) => FieldCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load field catalog {}", path.display()))?,
        None => FieldCatalog::new(),
    };

    let mut processor = ImportProcessor::new(pool, metadata);
    processor.set_mapping_id(mapping_id);

    let Some(contact_type) = contact_type else {
        // Without a contact type only the resolved fields can be shown
        let fields = processor.mapping_fields().await?;
        return Ok(serde_json::to_string_pretty(fields)?);
    };
    processor.set_contact_type(contact_type.parse::<ContactType>()?);

    let importer = processor.importer_object().await?;
    Ok(serde_json::to_string_pretty(&json!({
        "contact_type": importer.contact_type,
        "columns": importer.active_columns(),
    }))?)
}

pub async fn order_total(pool: &SqlitePool, input: &[String]) -> Result<String> {
    let pairs = input
        .iter()
        .map(|arg| parse_pair(arg))
        .collect::<Result<Vec<_>>>()?;

    let mut order = Order::new();
    order.set_price_selection_from_unfiltered_input(pairs);

    let priced = order.priced(pool, &PriceSetCalculator).await?;
    Ok(serde_json::to_string_pretty(&priced)?)
}

/// Split `key=value`; the value is read as JSON when it parses, else as a string
fn parse_pair(arg: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = arg.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{}'", arg);
    };
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
