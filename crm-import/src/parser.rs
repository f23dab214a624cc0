//! Contact import parser
//!
//! Receives the per-column parameters resolved from a saved mapping and turns
//! them into the list of columns an import run writes to.

use crm_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Name the import form uses for a column that is deliberately skipped
pub const DO_NOT_IMPORT: &str = "do_not_import";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    Individual,
    Household,
    Organization,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Household => "Household",
            Self::Organization => "Organization",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "household" => Ok(Self::Household),
            "organization" => Ok(Self::Organization),
            other => Err(Error::InvalidInput(format!("unknown contact type: {}", other))),
        }
    }
}

/// Column-wise parameters for the primary contact, one entry per column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapperColumns {
    pub keys: Vec<String>,
    pub location_types: Vec<Option<i64>>,
    pub phone_types: Vec<Option<i64>>,
    pub im_providers: Vec<Option<i64>>,
    pub website_types: Vec<Option<i64>>,
}

/// Column-wise parameters for related contacts
///
/// Saved mappings do not resolve these yet, so they are always empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedContactMappers {
    pub related: Vec<String>,
    pub contact_types: Vec<Option<String>>,
    pub details: Vec<String>,
    pub location_types: Vec<Option<i64>>,
    pub phone_types: Vec<Option<i64>>,
    pub im_providers: Vec<Option<i64>>,
    pub website_types: Vec<Option<i64>>,
}

/// One column the import writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportColumn {
    pub position: usize,
    pub name: String,
    pub location_type_id: Option<i64>,
    pub phone_type_id: Option<i64>,
    pub im_provider_id: Option<i64>,
    pub website_type_id: Option<i64>,
}

impl ImportColumn {
    pub fn is_mapped(&self) -> bool {
        !self.name.is_empty() && self.name != DO_NOT_IMPORT
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactImportParser {
    pub mapper: MapperColumns,
    pub related: RelatedContactMappers,
    pub contact_type: Option<ContactType>,
    active_columns: Vec<ImportColumn>,
    initialized: bool,
}

impl ContactImportParser {
    pub fn new(mapper: MapperColumns, related: RelatedContactMappers) -> Self {
        Self {
            mapper,
            related,
            contact_type: None,
            active_columns: Vec::new(),
            initialized: false,
        }
    }

    /// Build the active column list from the mapper parameters
    ///
    /// Safe to call again after the mapper is changed.
    pub fn init(&mut self) {
        let m = &self.mapper;
        let at = |values: &[Option<i64>], i: usize| values.get(i).copied().flatten();

        self.active_columns = m
            .keys
            .iter()
            .enumerate()
            .map(|(i, name)| ImportColumn {
                position: i,
                name: name.clone(),
                location_type_id: at(&m.location_types, i),
                phone_type_id: at(&m.phone_types, i),
                im_provider_id: at(&m.im_providers, i),
                website_type_id: at(&m.website_types, i),
            })
            .collect();
        self.initialized = true;

        debug!(
            "Import parser initialized: {} columns, {} mapped",
            self.active_columns.len(),
            self.mapped_columns().count()
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn active_columns(&self) -> &[ImportColumn] {
        &self.active_columns
    }

    pub fn mapped_columns(&self) -> impl Iterator<Item = &ImportColumn> {
        self.active_columns.iter().filter(|c| c.is_mapped())
    }
}
