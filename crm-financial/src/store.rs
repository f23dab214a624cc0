//! Persistence boundary for the price field catalog

use crate::price_set::{PriceField, PriceFieldValue};
use async_trait::async_trait;
use crm_common::db;
use crm_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Source of every known price field
#[async_trait]
pub trait PriceFieldStore: Send + Sync {
    async fn price_fields(&self) -> Result<Vec<PriceField>>;
}

#[async_trait]
impl PriceFieldStore for SqlitePool {
    async fn price_fields(&self) -> Result<Vec<PriceField>> {
        let field_rows = db::load_price_fields(self).await?;
        let value_rows = db::load_price_field_values(self).await?;

        let mut options: HashMap<i64, Vec<PriceFieldValue>> = HashMap::new();
        for row in value_rows {
            options.entry(row.price_field_id).or_default().push(PriceFieldValue {
                id: row.id,
                label: row.label,
                amount: row.amount,
                tax_rate: row.tax_rate,
            });
        }

        field_rows
            .into_iter()
            .map(|row| -> Result<PriceField> {
                Ok(PriceField {
                    id: row.id,
                    price_set_id: row.price_set_id,
                    html_type: row.html_type.parse()?,
                    options: options.remove(&row.id).unwrap_or_default(),
                    name: row.name,
                    label: row.label,
                })
            })
            .collect()
    }
}

#[async_trait]
impl<S: PriceFieldStore + ?Sized> PriceFieldStore for &S {
    async fn price_fields(&self) -> Result<Vec<PriceField>> {
        (**self).price_fields().await
    }
}
