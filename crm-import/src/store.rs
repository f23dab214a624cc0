//! Persistence boundary for saved mappings

use async_trait::async_trait;
use crm_common::db::{self, MappingFieldRow};
use crm_common::Result;
use sqlx::SqlitePool;

/// Source of saved mapping-field rows
#[async_trait]
pub trait MappingFieldStore: Send + Sync {
    /// Every row saved for `mapping_id`, in no particular order
    async fn mapping_fields(&self, mapping_id: i64) -> Result<Vec<MappingFieldRow>>;
}

#[async_trait]
impl MappingFieldStore for SqlitePool {
    async fn mapping_fields(&self, mapping_id: i64) -> Result<Vec<MappingFieldRow>> {
        db::load_mapping_fields(self, mapping_id).await
    }
}

#[async_trait]
impl<S: MappingFieldStore + ?Sized> MappingFieldStore for &S {
    async fn mapping_fields(&self, mapping_id: i64) -> Result<Vec<MappingFieldRow>> {
        (**self).mapping_fields(mapping_id).await
    }
}
