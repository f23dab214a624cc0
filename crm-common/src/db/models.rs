//! Database models

use serde::{Deserialize, Serialize};

/// Saved import mapping (one per named column layout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mapping {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub mapping_type: String,
}

/// Raw `mapping_field` row as persisted
///
/// `name` holds the field *label* the mapping was saved with, not the
/// canonical field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct MappingFieldRow {
    pub id: i64,
    pub mapping_id: i64,
    pub name: String,
    pub contact_type: Option<String>,
    pub column_number: i64,
    pub location_type_id: Option<i64>,
    pub phone_type_id: Option<i64>,
    pub im_provider_id: Option<i64>,
    pub website_type_id: Option<i64>,
    pub relationship_type_id: Option<i64>,
    pub relationship_direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriceFieldRow {
    pub id: i64,
    pub price_set_id: i64,
    pub name: String,
    pub label: String,
    pub html_type: String,
    pub weight: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriceFieldValueRow {
    pub id: i64,
    pub price_field_id: i64,
    pub name: String,
    pub label: String,
    pub amount: f64,
    /// Sales tax in percent
    pub tax_rate: Option<f64>,
    pub weight: i64,
    pub is_active: bool,
}
