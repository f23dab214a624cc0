//! Price field selections
//!
//! Form input carries price choices under keys like `price_3` next to every
//! other submitted value. `[price_3 => 4, price_10 => 7]` reads as option 4
//! for radio field 3 and a quantity of 7 for text field 10.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Key prefix of price field inputs
pub const PRICE_FIELD_PREFIX: &str = "price_";

/// Field id of a `price_<digits>` key, `None` for any other key
///
/// Ids too large for `u64` saturate to `u64::MAX`; the key is still a price key.
pub fn parse_price_field_key(key: &str) -> Option<u64> {
    let suffix = key.strip_prefix(PRICE_FIELD_PREFIX)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // All digits, so parsing only fails on overflow
    Some(suffix.parse().unwrap_or(u64::MAX))
}

/// Price field inputs keyed by their original `price_<id>` key, in submission order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSelection {
    entries: IndexMap<String, Value>,
}

impl PriceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the price field entries of arbitrary input
    pub fn from_unfiltered<I, K>(input: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut selection = Self::new();
        selection.extend_from_unfiltered(input);
        selection
    }

    /// Merge the price field entries of `input` into this selection
    ///
    /// Other keys are dropped without error. Existing entries are kept, and
    /// a repeated key takes the new value in its original position.
    pub fn extend_from_unfiltered<I, K>(&mut self, input: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in input {
            let key = key.into();
            if parse_price_field_key(&key).is_some() {
                self.entries.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Field id -> value
    ///
    /// Keys naming the same id (`price_3`, `price_03`) collapse into one
    /// entry holding the value that comes last.
    pub fn options(&self) -> IndexMap<u64, Value> {
        let mut options = IndexMap::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            if let Some(field_id) = parse_price_field_key(key) {
                options.insert(field_id, value.clone());
            }
        }
        options
    }
}
