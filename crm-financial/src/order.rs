//! Order pseudo-entity
//!
//! Holds the price selection submitted with a form and prices it against the
//! price field catalog.

use crate::price_set::{PricedOrder, PricingEngine};
use crate::selection::PriceSelection;
use crate::store::PriceFieldStore;
use crm_common::Result;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Order {
    price_selection: PriceSelection,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price_selection(&self) -> &PriceSelection {
        &self.price_selection
    }

    pub fn set_price_selection(&mut self, selection: PriceSelection) {
        self.price_selection = selection;
    }

    /// Take the price field entries out of everything a form submitted
    ///
    /// Accumulates across calls; non price keys are ignored.
    pub fn set_price_selection_from_unfiltered_input<I, K>(&mut self, input: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.price_selection.extend_from_unfiltered(input);
    }

    /// Selection keyed by price field id instead of `price_<id>`
    pub fn price_options(&self) -> IndexMap<u64, Value> {
        self.price_selection.options()
    }

    /// Price the selection against the full price field catalog
    pub async fn priced<S, E>(&self, store: &S, engine: &E) -> Result<PricedOrder>
    where
        S: PriceFieldStore + ?Sized,
        E: PricingEngine + ?Sized,
    {
        let fields = store.price_fields().await?;
        debug!(
            "Pricing {} selected fields against {} price fields",
            self.price_selection.len(),
            fields.len()
        );
        engine.process_amount(&fields, &self.price_selection)
    }

    /// Total amount of the selected items, as the engine computes it
    pub async fn total_amount<S, E>(&self, store: &S, engine: &E) -> Result<f64>
    where
        S: PriceFieldStore + ?Sized,
        E: PricingEngine + ?Sized,
    {
        Ok(self.priced(store, engine).await?.amount)
    }
}
