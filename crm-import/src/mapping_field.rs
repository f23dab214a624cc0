//! Resolved mapping field and column-order normalization

use crm_common::db::MappingFieldRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One import column's association with a target field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingField {
    /// Source-file column; the sole sort key
    pub column_number: i64,
    /// Label exactly as the mapping was saved
    #[serde(default)]
    pub label: String,
    /// Canonical field name; empty when the column is unmapped
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_type: Option<String>,
    #[serde(default)]
    pub relationship_type_id: Option<i64>,
    #[serde(default)]
    pub relationship_direction: Option<String>,
    #[serde(default)]
    pub location_type_id: Option<i64>,
    #[serde(default)]
    pub phone_type_id: Option<i64>,
    #[serde(default)]
    pub im_provider_id: Option<i64>,
    #[serde(default)]
    pub website_type_id: Option<i64>,
}

impl MappingField {
    /// Build from a persisted row; the row's saved name becomes `label`
    pub fn from_row(row: MappingFieldRow, name: String) -> Self {
        Self {
            column_number: row.column_number,
            label: row.name,
            name,
            contact_type: row.contact_type,
            relationship_type_id: row.relationship_type_id,
            relationship_direction: row.relationship_direction,
            location_type_id: row.location_type_id,
            phone_type_id: row.phone_type_id,
            im_provider_id: row.im_provider_id,
            website_type_id: row.website_type_id,
        }
    }

    /// Whether the column describes a related contact rather than a direct field
    ///
    /// A stored id of 0 means "none".
    pub fn is_relationship(&self) -> bool {
        self.relationship_type_id.is_some_and(|id| id != 0)
    }
}

/// Key fields by column number and return them densely in ascending column order
///
/// A later field with the same column number replaces the earlier one. Gaps
/// between column numbers are closed, so position `i` is the i-th column.
pub fn rekey_by_sorted_column_numbers(fields: Vec<MappingField>) -> Vec<MappingField> {
    let mut by_column = BTreeMap::new();
    for field in fields {
        by_column.insert(field.column_number, field);
    }
    by_column.into_values().collect()
}

/// Field name for a relationship column, derived from its saved label
///
/// Lowercase with spaces turned into underscores. `image_url` is spelled
/// `image_URL` on the target entity.
pub fn relationship_field_name(label: &str) -> String {
    let name = label.replace(' ', "_").to_ascii_lowercase();
    if name == "image_url" {
        return "image_URL".to_string();
    }
    name
}
