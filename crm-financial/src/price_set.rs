//! Price fields and the pricing engine
//!
//! A price field is one input on a contribution or event form. Its options
//! carry the amounts; the submitted value says which options were chosen and,
//! for text fields, how many.

use crate::selection::PriceSelection;
use crm_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HtmlType {
    /// Quantity entry against a single option
    Text,
    Select,
    Radio,
    CheckBox,
    #[serde(rename = "Multi-Select")]
    MultiSelect,
}

impl HtmlType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Select => "Select",
            Self::Radio => "Radio",
            Self::CheckBox => "CheckBox",
            Self::MultiSelect => "Multi-Select",
        }
    }
}

impl fmt::Display for HtmlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HtmlType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Text" => Ok(Self::Text),
            "Select" => Ok(Self::Select),
            "Radio" => Ok(Self::Radio),
            "CheckBox" => Ok(Self::CheckBox),
            "Multi-Select" | "MultiSelect" => Ok(Self::MultiSelect),
            other => Err(Error::InvalidInput(format!("unknown price field html type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFieldValue {
    pub id: i64,
    pub label: String,
    pub amount: f64,
    /// Sales tax in percent
    pub tax_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceField {
    pub id: i64,
    pub price_set_id: i64,
    pub name: String,
    pub label: String,
    pub html_type: HtmlType,
    /// Options in display order
    pub options: Vec<PriceFieldValue>,
}

impl PriceField {
    pub fn option(&self, option_id: i64) -> Option<&PriceFieldValue> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub price_field_id: i64,
    pub price_field_value_id: i64,
    pub label: String,
    pub qty: f64,
    pub unit_price: f64,
    pub line_total: f64,
    pub tax_amount: f64,
}

/// Result of pricing a selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricedOrder {
    pub line_items: Vec<LineItem>,
    /// Line totals plus tax
    pub amount: f64,
    pub tax_amount: f64,
}

/// Computes line items and totals for a price selection
pub trait PricingEngine: Send + Sync {
    fn process_amount(&self, fields: &[PriceField], selection: &PriceSelection) -> Result<PricedOrder>;
}

/// Default engine: one line per chosen option, per-line sales tax
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceSetCalculator;

impl PricingEngine for PriceSetCalculator {
    fn process_amount(&self, fields: &[PriceField], selection: &PriceSelection) -> Result<PricedOrder> {
        let mut order = PricedOrder::default();
        let options = selection.options();

        for field in fields {
            let Ok(field_id) = u64::try_from(field.id) else {
                continue;
            };
            let Some(value) = options.get(&field_id) else {
                continue;
            };
            if is_empty_value(value) {
                continue;
            }

            match field.html_type {
                HtmlType::Text => {
                    let qty = as_number(value).ok_or_else(|| {
                        Error::InvalidInput(format!("price field {}: quantity {} is not a number", field.id, value))
                    })?;
                    if qty <= 0.0 {
                        continue;
                    }
                    let option = field.options.first().ok_or_else(|| {
                        Error::InvalidInput(format!("price field {} has no options", field.id))
                    })?;
                    order.line_items.push(line_item(field, option, qty));
                }
                HtmlType::Select | HtmlType::Radio => {
                    let option_id = as_option_id(value).ok_or_else(|| {
                        Error::InvalidInput(format!("price field {}: {} is not an option id", field.id, value))
                    })?;
                    let option = lookup_option(field, option_id)?;
                    order.line_items.push(line_item(field, option, 1.0));
                }
                HtmlType::CheckBox | HtmlType::MultiSelect => {
                    let chosen = chosen_option_ids(field, value)?;
                    for option in field.options.iter().filter(|o| chosen.contains(&o.id)) {
                        order.line_items.push(line_item(field, option, 1.0));
                    }
                }
            }
        }

        let mut amount = 0.0;
        let mut tax_amount = 0.0;
        for line in &order.line_items {
            amount += line.line_total + line.tax_amount;
            tax_amount += line.tax_amount;
        }
        order.amount = round_money(amount);
        order.tax_amount = round_money(tax_amount);

        debug!(
            "Priced {} line items: amount {:.2} (tax {:.2})",
            order.line_items.len(),
            order.amount,
            order.tax_amount
        );
        Ok(order)
    }
}

fn line_item(field: &PriceField, option: &PriceFieldValue, qty: f64) -> LineItem {
    let line_total = round_money(qty * option.amount);
    let tax_amount = option
        .tax_rate
        .map(|rate| round_money(line_total * rate / 100.0))
        .unwrap_or(0.0);

    LineItem {
        price_field_id: field.id,
        price_field_value_id: option.id,
        label: option.label.clone(),
        qty,
        unit_price: option.amount,
        line_total,
        tax_amount,
    }
}

fn lookup_option(field: &PriceField, option_id: i64) -> Result<&PriceFieldValue> {
    field.option(option_id).ok_or_else(|| {
        Error::InvalidInput(format!("price field {} has no option {}", field.id, option_id))
    })
}

/// Option ids chosen on a multi-option field
///
/// Accepts `{"<option id>": <truthy>}`, an array of ids, or a single id.
fn chosen_option_ids(field: &PriceField, value: &Value) -> Result<HashSet<i64>> {
    fn invalid(field_id: i64, v: impl fmt::Display) -> Error {
        Error::InvalidInput(format!("price field {}: {} is not an option id", field_id, v))
    }

    let ids: Vec<i64> = match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, checked)| !is_empty_value(checked))
            .map(|(key, _)| key.trim().parse::<i64>().map_err(|_| invalid(field.id, key)))
            .collect::<Result<_>>()?,
        Value::Array(items) => items
            .iter()
            .map(|item| as_option_id(item).ok_or_else(|| invalid(field.id, item)))
            .collect::<Result<_>>()?,
        other => vec![as_option_id(other).ok_or_else(|| invalid(field.id, other))?],
    };

    for &id in &ids {
        lookup_option(field, id)?;
    }
    Ok(ids.into_iter().collect())
}

/// Form-style emptiness: null, false, 0, "", "0", empty arrays and objects
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Finite numeric value; "NaN" and "inf" strings are not quantities
fn as_number(value: &Value) -> Option<f64> {
    let number: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn as_option_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(id: i64, label: &str, amount: f64) -> PriceFieldValue {
        PriceFieldValue {
            id,
            label: label.to_string(),
            amount,
            tax_rate: None,
        }
    }

    fn field(id: i64, html_type: HtmlType, options: Vec<PriceFieldValue>) -> PriceField {
        PriceField {
            id,
            price_set_id: 1,
            name: format!("field_{}", id),
            label: format!("Field {}", id),
            html_type,
            options,
        }
    }

    fn catalog() -> Vec<PriceField> {
        vec![
            field(3, HtmlType::Radio, vec![option(4, "Student", 25.0), option(5, "General", 50.0)]),
            field(10, HtmlType::Text, vec![option(11, "Tickets", 12.5)]),
            field(
                20,
                HtmlType::CheckBox,
                vec![option(21, "Lunch", 15.0), option(22, "Dinner", 30.0), option(23, "Parking", 5.0)],
            ),
        ]
    }

    fn price(input: Value) -> Result<PricedOrder> {
        let map = input.as_object().cloned().unwrap_or_default();
        let selection = PriceSelection::from_unfiltered(map);
        PriceSetCalculator.process_amount(&catalog(), &selection)
    }

    #[test]
    fn test_radio_and_text_quantity() {
        let order = price(json!({"price_3": 4, "price_10": 7})).unwrap();

        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.line_items[0].label, "Student");
        assert_eq!(order.line_items[1].qty, 7.0);
        assert_eq!(order.line_items[1].line_total, 87.5);
        assert_eq!(order.amount, 112.5);
        assert_eq!(order.tax_amount, 0.0);
    }

    #[test]
    fn test_string_values_are_accepted() {
        let order = price(json!({"price_3": "5", "price_10": "2"})).unwrap();
        assert_eq!(order.amount, 75.0);
    }

    #[test]
    fn test_checkbox_object_and_array() {
        let order = price(json!({"price_20": {"21": 1, "22": 0, "23": "1"}})).unwrap();
        let labels: Vec<&str> = order.line_items.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Lunch", "Parking"]);
        assert_eq!(order.amount, 20.0);

        let order = price(json!({"price_20": [22, "23"]})).unwrap();
        assert_eq!(order.amount, 35.0);
    }

    #[test]
    fn test_empty_and_missing_fields_are_skipped() {
        let order = price(json!({"price_3": "", "price_10": 0, "other": 9})).unwrap();
        assert!(order.line_items.is_empty());
        assert_eq!(order.amount, 0.0);

        let order = price(json!({"price_10": -2})).unwrap();
        assert!(order.line_items.is_empty());
    }

    #[test]
    fn test_unknown_option_is_invalid() {
        let err = price(json!({"price_3": 99})).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = price(json!({"price_20": {"99": 1}})).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_non_numeric_quantity_is_invalid() {
        let err = price(json!({"price_10": "lots"})).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_tax_is_added_per_line() {
        let mut fields = catalog();
        fields[1].options[0].tax_rate = Some(10.0);
        let selection = PriceSelection::from_unfiltered(vec![("price_10", json!(3)), ("price_3", json!(5))]);

        let order = PriceSetCalculator.process_amount(&fields, &selection).unwrap();
        assert_eq!(order.line_items[1].tax_amount, 3.75);
        assert_eq!(order.tax_amount, 3.75);
        assert_eq!(order.amount, 50.0 + 37.5 + 3.75);
    }

    #[test]
    fn test_non_finite_quantity_is_invalid() {
        for quantity in ["NaN", "inf", "-inf", "infinity"] {
            let err = price(json!({"price_10": quantity})).unwrap_err();
            assert!(
                matches!(err, Error::InvalidInput(_)),
                "quantity {:?} should be rejected",
                quantity
            );
        }
    }

    #[test]
    fn test_zero_padded_key_is_priced() {
        let order = price(json!({"price_010": 2, "price_03": "5"})).unwrap();
        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.amount, 75.0);
    }

    #[test]
    fn test_html_type_parse() {
        assert_eq!("Multi-Select".parse::<HtmlType>().unwrap(), HtmlType::MultiSelect);
        assert_eq!("CheckBox".parse::<HtmlType>().unwrap(), HtmlType::CheckBox);
        assert!("Slider".parse::<HtmlType>().is_err());
    }
}
