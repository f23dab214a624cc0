//! # CRM Import
//!
//! Resolves a saved column-to-field mapping into the per-column parameters
//! the contact import parser consumes:
//! - `ImportProcessor`: loads, normalizes and indexes mapping fields
//! - `FieldCatalog`: importable field metadata, looked up by title
//! - `ContactImportParser`: the parameterized import parser handed to callers

pub mod mapping_field;
pub mod metadata;
pub mod parser;
pub mod processor;
pub mod store;

pub use mapping_field::MappingField;
pub use metadata::{FieldCatalog, FieldMetadata};
pub use parser::{ContactImportParser, ContactType, ImportColumn};
pub use processor::ImportProcessor;
pub use store::MappingFieldStore;
