//! Model-layer interfaces
//!
//! Helpers read form targets through the [`Record`] trait and never assume a
//! concrete persistence layer. Attribute values are carried as a tagged
//! [`Value`], so the formatter can dispatch on the declared kind instead of
//! sniffing strings.

use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single attribute value read from a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Value {
    /// The attribute exists but holds nothing
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    /// A symbolic value out of a declared, finite set of values
    Enum(String),
    /// Multi-valued attribute, e.g. a multi-select
    List(Vec<Value>),
}

impl Value {
    /// Blank means "nothing worth displaying": null, whitespace-only text,
    /// empty enum symbol or empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) | Value::Enum(s) => s.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value. Text is parsed; floats go through their
    /// shortest decimal representation so `7.567_f64` stays `7.567`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            Value::Float(f) if f.is_finite() => Decimal::from_str(&f.to_string())
                .ok()
                .or_else(|| Decimal::from_scientific(&format!("{f:e}")).ok()),
            Value::Text(s) => {
                let trimmed = s.trim();
                Decimal::from_str(trimmed)
                    .ok()
                    .or_else(|| Decimal::from_scientific(trimmed).ok())
            }
            _ => None,
        }
    }

    /// Checkbox semantics: `true`, `1`, `"1"`, `"true"` are checked.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Text(s) => matches!(s.trim(), "1" | "true" | "t" | "yes"),
            _ => false,
        }
    }

    /// The string submitted for this value in an input element.
    pub fn to_param(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) | Value::Enum(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::to_param)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Every submitted string of the value; a list yields one entry per item.
    pub fn to_params(&self) -> Vec<String> {
        match self {
            Value::List(items) => items.iter().map(Value::to_param).collect(),
            Value::Null => Vec::new(),
            other => vec![other.to_param()],
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date_naive()),
            Value::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_param())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Complete number-to-currency settings.
///
/// All five keys always travel together: a partial format would otherwise be
/// filled in from a different source than the one that was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub unit: String,
    /// Layout with `%u` (unit) and `%n` (number) placeholders
    pub format: String,
    pub precision: u32,
    pub delimiter: String,
    pub separator: String,
}

impl CurrencyFormat {
    /// The `"1,234.50 $"` style used for dollar-like currencies.
    pub fn dollar_style(unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            format: "%n %u".to_string(),
            precision: 2,
            delimiter: ",".to_string(),
            separator: ".".to_string(),
        }
    }

    /// The `"1.234,50 €"` style used for the euro.
    pub fn euro_style(unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            format: "%n %u".to_string(),
            precision: 2,
            delimiter: ".".to_string(),
            separator: ",".to_string(),
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            unit: "$".to_string(),
            format: "%u%n".to_string(),
            precision: 2,
            delimiter: ",".to_string(),
            separator: ".".to_string(),
        }
    }
}

/// A form or list target backed by the host's model layer.
pub trait Record {
    /// Registry name of the record's model, e.g. `"Client"`.
    fn model_name(&self) -> &str;

    /// Read an attribute. `None` means the record has no such attribute or it
    /// cannot be read; `Some(Value::Null)` means it exists but is empty.
    fn attribute(&self, field: &str) -> Option<Value>;

    /// Per-object currency settings for one money field.
    fn currency_format(&self, _field: &str) -> Option<CurrencyFormat> {
        None
    }

    fn is_new_record(&self) -> bool {
        false
    }

    /// Primary key as submitted in forms.
    fn id(&self) -> Option<String> {
        self.attribute("id")
            .filter(|v| !v.is_blank())
            .map(|v| v.to_param())
    }

    /// Text shown when the record itself is offered as a select choice.
    fn display_label(&self) -> String {
        self.id().unwrap_or_default()
    }

    /// Link target of the record's detail page.
    fn url(&self) -> Option<String> {
        None
    }
}

/// A plain mapping used as form target when no model object exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlainRecord {
    model: String,
    values: IndexMap<String, Value>,
    new_record: bool,
}

impl PlainRecord {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            values: IndexMap::new(),
            new_record: false,
        }
    }

    /// A record that has not been persisted yet.
    pub fn new_record(model: impl Into<String>) -> Self {
        Self {
            new_record: true,
            ..Self::new(model)
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }
}

impl Record for PlainRecord {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn attribute(&self, field: &str) -> Option<Value> {
        self.values.get(field).cloned()
    }

    fn is_new_record(&self) -> bool {
        self.new_record
    }

    fn display_label(&self) -> String {
        ["name", "title", "label"]
            .iter()
            .find_map(|f| self.values.get(*f).filter(|v| !v.is_blank()))
            .map(Value::to_param)
            .or_else(|| self.id())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("  ").is_blank());
        assert!(Value::List(vec![]).is_blank());
        assert!(!Value::from(0).is_blank());
        assert!(!Value::from(false).is_blank());
    }

    #[test]
    fn test_as_decimal_keeps_visible_digits() {
        assert_eq!(Value::from(7.567).as_decimal(), Some(dec("7.567")));
        assert_eq!(Value::from("19.50").as_decimal(), Some(dec("19.50")));
        assert_eq!(Value::from(19).as_decimal(), Some(dec("19")));
        assert_eq!(Value::from("abc").as_decimal(), None);
        assert_eq!(Value::from(true).as_decimal(), None);
    }

    #[test]
    fn test_to_params() {
        let value = Value::from(vec!["a", "b"]);
        assert_eq!(value.to_params(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(value.to_param(), "a,b");
        assert!(Value::Null.to_params().is_empty());
    }

    #[test]
    fn test_plain_record() {
        let record = PlainRecord::new("Client")
            .with("id", 7)
            .with("name", "ACME")
            .with("notes", Value::Null);
        assert_eq!(record.model_name(), "Client");
        assert_eq!(record.attribute("name"), Some(Value::from("ACME")));
        assert_eq!(record.attribute("notes"), Some(Value::Null));
        assert_eq!(record.attribute("missing"), None);
        assert_eq!(record.id(), Some("7".to_string()));
        assert_eq!(record.display_label(), "ACME");
        assert!(!record.is_new_record());
        assert!(PlainRecord::new_record("Address").is_new_record());
    }

    #[test]
    fn test_truthy() {
        assert!(Value::from(true).is_truthy());
        assert!(Value::from("1").is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(!Value::Null.is_truthy());
    }
}
