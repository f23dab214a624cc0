//! Import processor
//!
//! Translates between the saved mapping-field format and the parameters the
//! contact import parser takes. Mapping fields are loaded from the store on
//! first access when a mapping id is set, then kept for the rest of the
//! import session.

use crate::mapping_field::{rekey_by_sorted_column_numbers, relationship_field_name, MappingField};
use crate::metadata::FieldCatalog;
use crate::parser::{ContactImportParser, ContactType, MapperColumns, RelatedContactMappers};
use crate::store::MappingFieldStore;
use crm_common::{Error, Result};
use indexmap::IndexMap;
use tracing::{debug, info};

pub struct ImportProcessor<S> {
    store: S,
    /// Sorted by column number, position == column order
    mapping_fields: Vec<MappingField>,
    metadata: FieldCatalog,
    /// Title -> field name, built on first lookup
    metadata_by_title: Option<IndexMap<String, String>>,
    contact_type: Option<ContactType>,
    mapping_id: Option<i64>,
}

impl<S: MappingFieldStore> ImportProcessor<S> {
    pub fn new(store: S, metadata: FieldCatalog) -> Self {
        Self {
            store,
            mapping_fields: Vec::new(),
            metadata,
            metadata_by_title: None,
            contact_type: None,
            mapping_id: None,
        }
    }

    pub fn metadata(&self) -> &FieldCatalog {
        &self.metadata
    }

    /// Replace the field catalog; the title index is rebuilt on next use
    pub fn set_metadata(&mut self, metadata: FieldCatalog) {
        self.metadata = metadata;
        self.metadata_by_title = None;
    }

    pub fn mapping_id(&self) -> Option<i64> {
        self.mapping_id
    }

    pub fn set_mapping_id(&mut self, mapping_id: i64) {
        self.mapping_id = Some(mapping_id);
    }

    pub fn contact_type(&self) -> Option<ContactType> {
        self.contact_type
    }

    pub fn set_contact_type(&mut self, contact_type: ContactType) {
        self.contact_type = Some(contact_type);
    }

    /// Mapping fields in column order
    ///
    /// Loads the saved mapping when no fields are held yet and a (non-zero)
    /// mapping id is set.
    pub async fn mapping_fields(&mut self) -> Result<&[MappingField]> {
        if self.mapping_fields.is_empty() && self.mapping_id.is_some_and(|id| id != 0) {
            self.load_saved_mapping().await?;
        }
        Ok(&self.mapping_fields)
    }

    /// Install fields directly, bypassing the store
    pub fn set_mapping_fields(&mut self, fields: Vec<MappingField>) {
        self.mapping_fields = rekey_by_sorted_column_numbers(fields);
    }

    pub async fn field_names(&mut self) -> Result<Vec<String>> {
        self.collect(|f| f.name.clone()).await
    }

    pub async fn im_provider_id(&mut self, column: usize) -> Result<Option<i64>> {
        Ok(self.column(column).await?.and_then(|f| f.im_provider_id))
    }

    pub async fn phone_type_id(&mut self, column: usize) -> Result<Option<i64>> {
        Ok(self.column(column).await?.and_then(|f| f.phone_type_id))
    }

    pub async fn website_type_id(&mut self, column: usize) -> Result<Option<i64>> {
        Ok(self.column(column).await?.and_then(|f| f.website_type_id))
    }

    /// Location type of a column, 0 when unset
    ///
    /// Callers rely on 0 rather than `None` here.
    pub async fn location_type_id(&mut self, column: usize) -> Result<i64> {
        Ok(self
            .column(column)
            .await?
            .and_then(|f| f.location_type_id)
            .unwrap_or(0))
    }

    /// IM provider of a column, falling back to its phone type
    pub async fn phone_or_im_type_id(&mut self, column: usize) -> Result<Option<i64>> {
        match self.im_provider_id(column).await? {
            Some(id) => Ok(Some(id)),
            None => self.phone_type_id(column).await,
        }
    }

    pub async fn field_location_types(&mut self) -> Result<Vec<Option<i64>>> {
        self.collect(|f| f.location_type_id).await
    }

    pub async fn field_phone_types(&mut self) -> Result<Vec<Option<i64>>> {
        self.collect(|f| f.phone_type_id).await
    }

    pub async fn field_im_provider_types(&mut self) -> Result<Vec<Option<i64>>> {
        self.collect(|f| f.im_provider_id).await
    }

    /// Website types handed to the import parser
    ///
    /// Reads the IM provider of each column, not `website_type_id`. The parser
    /// has always received these values; see DESIGN.md before changing it.
    pub async fn field_website_types(&mut self) -> Result<Vec<Option<i64>>> {
        self.collect(|f| f.im_provider_id).await
    }

    /// Build and initialize the contact import parser for this mapping
    pub async fn importer_object(&mut self) -> Result<ContactImportParser> {
        let contact_type = self
            .contact_type
            .ok_or_else(|| Error::InvalidInput("contact type must be set before import".to_string()))?;

        let mapper = MapperColumns {
            keys: self.field_names().await?,
            location_types: self.field_location_types().await?,
            phone_types: self.field_phone_types().await?,
            im_providers: self.field_im_provider_types().await?,
            website_types: self.field_website_types().await?,
        };

        let mut importer = ContactImportParser::new(mapper, RelatedContactMappers::default());
        importer.init();
        importer.contact_type = Some(contact_type);

        info!(
            "Built {} importer with {} columns",
            contact_type,
            importer.active_columns().len()
        );
        Ok(importer)
    }

    /// Title -> field name index over the metadata catalog
    pub fn metadata_by_title(&mut self) -> &IndexMap<String, String> {
        let metadata = &self.metadata;
        self.metadata_by_title
            .get_or_insert_with(|| metadata.title_index())
    }

    /// Field name for a saved label, empty when the catalog has no such title
    fn name_from_label(&mut self, label: &str) -> String {
        self.metadata_by_title()
            .get(label)
            .cloned()
            .unwrap_or_default()
    }

    async fn load_saved_mapping(&mut self) -> Result<()> {
        let Some(mapping_id) = self.mapping_id else {
            return Ok(());
        };

        let rows = self.store.mapping_fields(mapping_id).await?;
        debug!("Resolving {} saved fields of mapping {}", rows.len(), mapping_id);

        let mut fields = Vec::with_capacity(rows.len());
        for row in rows {
            // Mappings are saved by label, not name
            let name = match row.relationship_type_id {
                Some(id) if id != 0 => relationship_field_name(&row.name),
                _ => self.name_from_label(&row.name),
            };
            fields.push(MappingField::from_row(row, name));
        }

        self.mapping_fields = rekey_by_sorted_column_numbers(fields);
        Ok(())
    }

    async fn column(&mut self, column: usize) -> Result<Option<&MappingField>> {
        Ok(self.mapping_fields().await?.get(column))
    }

    async fn collect<T>(&mut self, f: impl Fn(&MappingField) -> T) -> Result<Vec<T>> {
        Ok(self.mapping_fields().await?.iter().map(f).collect())
    }
}
