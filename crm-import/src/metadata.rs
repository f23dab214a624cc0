//! Importable field metadata

use crm_common::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Descriptor of one importable field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Human-readable title; saved mappings store this rather than the name
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
}

impl FieldMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            data_type: None,
        }
    }
}

/// Field name -> descriptor, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: IndexMap<String, FieldMetadata>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `{ "<name>": { "title": ... }, ... }`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("field catalog: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, name: impl Into<String>, metadata: FieldMetadata) {
        self.fields.insert(name.into(), metadata);
    }

    pub fn get(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldMetadata)> {
        self.fields.iter()
    }

    /// Reverse index, title -> field name
    ///
    /// Untitled fields are skipped. When two fields share a title the one
    /// declared later wins.
    pub fn title_index(&self) -> IndexMap<String, String> {
        let mut index = IndexMap::with_capacity(self.fields.len());
        for (name, metadata) in &self.fields {
            if let Some(title) = &metadata.title {
                index.insert(title.clone(), name.clone());
            }
        }
        index
    }
}

impl<N: Into<String>> FromIterator<(N, FieldMetadata)> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = (N, FieldMetadata)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(n, m)| (n.into(), m)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_index_maps_title_to_name() {
        let catalog: FieldCatalog = [
            ("first_name", FieldMetadata::titled("First Name")),
            ("last_name", FieldMetadata::titled("Last Name")),
            ("id", FieldMetadata::default()),
        ]
        .into_iter()
        .collect();

        let index = catalog.title_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("First Name").map(String::as_str), Some("first_name"));
        assert_eq!(index.get("Last Name").map(String::as_str), Some("last_name"));
    }

    #[test]
    fn test_duplicate_title_later_field_wins() {
        let catalog: FieldCatalog = [
            ("email", FieldMetadata::titled("Email")),
            ("email_primary", FieldMetadata::titled("Email")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            catalog.title_index().get("Email").map(String::as_str),
            Some("email_primary")
        );
    }

    #[test]
    fn test_from_json_keeps_declaration_order() {
        let catalog = FieldCatalog::from_json(
            r#"{
                "last_name": {"title": "Last Name", "data_type": "String"},
                "first_name": {"title": "First Name"}
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = catalog.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["last_name", "first_name"]);
        assert_eq!(
            catalog.get("last_name").and_then(|m| m.data_type.as_deref()),
            Some("String")
        );
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(FieldCatalog::from_json("[1, 2]").is_err());
    }
}
