//! # CRM Financial
//!
//! Orders built from submitted price-field selections:
//! - `PriceSelection`: the `price_<id>` entries filtered out of raw form input
//! - `Order`: holds a selection and prices it
//! - `PricingEngine` / `PriceSetCalculator`: turns a selection into line items and a total

pub mod order;
pub mod price_set;
pub mod selection;
pub mod store;

pub use order::Order;
pub use price_set::{
    HtmlType, LineItem, PriceField, PriceFieldValue, PriceSetCalculator, PricedOrder,
    PricingEngine,
};
pub use selection::{parse_price_field_key, PriceSelection, PRICE_FIELD_PREFIX};
pub use store::PriceFieldStore;
