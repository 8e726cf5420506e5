//! Per-call field options

use regalia_common::html::is_attribute_name;
use regalia_common::{Attributes, RegaliaError, Result, Value};
use regalia_format::FormatOptions;
use serde_json::Value as JsonValue;

use crate::choices::ChoiceSet;
use crate::context::Align;
use crate::wrapper::WrapOptions;

/// Name of a form field.
///
/// An attribute name is bound to the builder's object: the input is named
/// `object[field]`, gets an id and an automatic info annotation. A raw name is
/// used exactly as given, without id and without automatic info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldName {
    Attribute(String),
    Raw(String),
}

impl FieldName {
    pub fn attribute(name: impl Into<String>) -> Self {
        FieldName::Attribute(name.into())
    }

    pub fn raw(name: impl Into<String>) -> Self {
        FieldName::Raw(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldName::Attribute(name) | FieldName::Raw(name) => name,
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, FieldName::Attribute(_))
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        FieldName::Attribute(name.to_string())
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        FieldName::Attribute(name)
    }
}

/// Inline help shown after an input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Info {
    /// Look up `{field}_info_html`, then `{field}_info` for attribute fields
    #[default]
    Auto,
    /// Literal markup
    Text(String),
    /// Look up `{key}_info_html`, then `{key}_info`
    Key(String),
    /// No annotation
    None,
}

/// Options of a single field call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    /// Caption instead of the translated attribute name
    pub title: Option<String>,
    /// Value instead of the object's attribute
    pub value: Option<Value>,
    pub info: Info,
    /// Attributes of the input element itself
    pub attrs: Attributes,
    /// Attributes of the wrapper elements
    pub wrap: WrapOptions,
    /// Choices of a selection field
    pub choices: Option<ChoiceSet>,
    /// Selected value(s), defaults to the field value
    pub selected: Option<Value>,
    /// Leading empty option, on by default
    pub include_blank: Option<bool>,
    /// Checked state of a checkbox, defaults to the attribute's truthiness
    pub checked: Option<bool>,
    /// Skip the span around submit buttons
    pub nowrap: bool,
    /// Formatting of static values
    pub format: FormatOptions,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn info(mut self, text: impl Into<String>) -> Self {
        self.info = Info::Text(text.into());
        self
    }

    pub fn info_key(mut self, key: impl Into<String>) -> Self {
        self.info = Info::Key(key.into());
        self
    }

    pub fn no_info(mut self) -> Self {
        self.info = Info::None;
        self
    }

    /// Set an attribute of the input element.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value);
        self
    }

    /// Add classes to the input element.
    pub fn class(mut self, classes: &str) -> Self {
        self.attrs.add_class(classes);
        self
    }

    pub fn choices(mut self, choices: ChoiceSet) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn selected(mut self, selected: impl Into<Value>) -> Self {
        self.selected = Some(selected.into());
        self
    }

    pub fn include_blank(mut self, include: bool) -> Self {
        self.include_blank = Some(include);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn nowrap(mut self) -> Self {
        self.nowrap = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.wrap.align = Some(align);
        self
    }

    pub fn wrap(mut self, wrap: WrapOptions) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Read options from a JSON map as handed over by templates.
    ///
    /// Known keys: `title`, `value`, `info` (string, `false` or
    /// `{"key": ...}`), `class`, `choices` (list of strings, list of
    /// `[label, value]` pairs or a label → value map), `selected`,
    /// `include_blank`, `checked`, `nowrap`, `align`, `html` (input
    /// attributes), `dt`, `dd`, `label`, `td` (wrapper attributes) plus the
    /// formatting keys `currency`, `date` and `format`. Any other scalar key
    /// becomes an attribute of the input element.
    pub fn from_json(options: &JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = options else {
            return Err(invalid(format!("expected a map, got {options}")));
        };

        let mut parsed = FieldOptions {
            format: FormatOptions::from_json(options)?,
            ..Default::default()
        };
        for (key, value) in map {
            match key.as_str() {
                "currency" | "date" | "format" => {}
                "title" => parsed.title = Some(expect_string(key, value)?),
                "value" => parsed.value = Some(json_to_value(key, value)?),
                "selected" => parsed.selected = Some(json_to_value(key, value)?),
                "info" => parsed.info = parse_info(value)?,
                "class" => {
                    parsed.attrs.add_class(&expect_string(key, value)?);
                }
                "choices" => parsed.choices = Some(parse_choices(value)?),
                "include_blank" => parsed.include_blank = Some(expect_bool(key, value)?),
                "checked" => parsed.checked = Some(expect_bool(key, value)?),
                "nowrap" => parsed.nowrap = expect_bool(key, value)?,
                "align" => {
                    let align = expect_string(key, value)?;
                    parsed.wrap.align = Some(
                        Align::parse(&align)
                            .ok_or_else(|| invalid(format!("unknown alignment {align}")))?,
                    );
                }
                "html" => parsed.attrs.merge(&parse_attributes(key, value)?),
                "dt" => parsed.wrap.dt = parse_attributes(key, value)?,
                "dd" => parsed.wrap.dd = parse_attributes(key, value)?,
                "label" => parsed.wrap.label = parse_attributes(key, value)?,
                "td" => parsed.wrap.td = parse_attributes(key, value)?,
                _ => {
                    parsed.attrs.insert(attribute_name(key)?, scalar_to_string(key, value)?);
                }
            }
        }
        Ok(parsed)
    }
}

fn invalid(message: String) -> RegaliaError {
    RegaliaError::argument("field options", message)
}

fn expect_string(key: &str, value: &JsonValue) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("{key} must be a string, got {value}")))
}

fn expect_bool(key: &str, value: &JsonValue) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(format!("{key} must be true or false, got {value}")))
}

fn scalar_to_string(key: &str, value: &JsonValue) -> Result<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(invalid(format!("unsupported value for {key}: {other}"))),
    }
}

fn json_to_value(key: &str, value: &JsonValue) -> Result<Value> {
    Ok(match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Text(n.to_string()),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(items) => Value::List(
            items
                .iter()
                .map(|item| json_to_value(key, item))
                .collect::<Result<_>>()?,
        ),
        JsonValue::Object(_) => {
            return Err(invalid(format!("unsupported value for {key}: {value}")))
        }
    })
}

fn parse_info(value: &JsonValue) -> Result<Info> {
    match value {
        JsonValue::Null | JsonValue::Bool(false) => Ok(Info::None),
        JsonValue::Bool(true) => Ok(Info::Auto),
        JsonValue::String(text) => Ok(Info::Text(text.clone())),
        JsonValue::Object(map) => match map.get("key") {
            Some(JsonValue::String(key)) if map.len() == 1 => Ok(Info::Key(key.clone())),
            _ => Err(invalid(format!("unsupported info {value}"))),
        },
        other => Err(invalid(format!("unsupported info {other}"))),
    }
}

fn parse_choices(value: &JsonValue) -> Result<ChoiceSet> {
    match value {
        JsonValue::Object(map) => map
            .iter()
            .map(|(label, v)| Ok((label.clone(), scalar_to_string("choices", v)?)))
            .collect::<Result<Vec<_>>>()
            .map(ChoiceSet::map),
        JsonValue::Array(items) if items.iter().all(JsonValue::is_array) => items
            .iter()
            .map(|pair| match pair.as_array().map(Vec::as_slice) {
                Some([label, value]) => Ok((
                    scalar_to_string("choices", label)?,
                    scalar_to_string("choices", value)?,
                )),
                _ => Err(invalid(format!("choice pairs need two entries, got {pair}"))),
            })
            .collect::<Result<Vec<_>>>()
            .map(ChoiceSet::pairs),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| scalar_to_string("choices", item))
            .collect::<Result<Vec<_>>>()
            .map(ChoiceSet::flat),
        other => Err(invalid(format!("unsupported choices {other}"))),
    }
}

fn attribute_name(name: &str) -> Result<&str> {
    if is_attribute_name(name) {
        Ok(name)
    } else {
        Err(invalid(format!("{name:?} is not a valid attribute name")))
    }
}

fn parse_attributes(key: &str, value: &JsonValue) -> Result<Attributes> {
    let JsonValue::Object(map) = value else {
        return Err(invalid(format!("{key} must be a map, got {value}")));
    };
    map.iter()
        .map(|(name, v)| Ok((attribute_name(name)?.to_string(), scalar_to_string(name, v)?)))
        .collect()
}
