//! Form entry points
//!
//! `form_for` emits the `<form>` element with its method override and CSRF
//! token markup, then hands a [`FormBuilder`] of the requested style to the
//! block. `fields_for` does the same without the form element.

use std::fmt;

use regalia_common::html::{content_tag, tag};
use regalia_common::{Attributes, Record, RegaliaError, Result};
use regalia_format::ValueFormatter;
use serde_json::Value as JsonValue;

use crate::builder::FormBuilder;
use crate::wrapper::FormStyle;

/// HTTP verb of a form. Browsers only submit `get` and `post`; other verbs
/// are posted with a hidden `_method` field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMethod {
    Get,
    #[default]
    Post,
    Other(String),
}

impl FormMethod {
    /// Case-insensitive parse; an empty verb means `post`.
    pub fn parse(method: &str) -> Self {
        let method = method.trim().to_lowercase();
        match method.as_str() {
            "get" => FormMethod::Get,
            "post" | "" => FormMethod::Post,
            _ => FormMethod::Other(method),
        }
    }

    /// Value of the form's `method` attribute.
    pub fn form_method(&self) -> &'static str {
        match self {
            FormMethod::Get => "get",
            _ => "post",
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormMethod::Get => write!(f, "get"),
            FormMethod::Post => write!(f, "post"),
            FormMethod::Other(verb) => write!(f, "{verb}"),
        }
    }
}

/// Everything `form_for` needs besides the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSettings {
    pub action: String,
    pub method: FormMethod,
    /// Authenticity token, `None` when forgery protection is off
    pub token: Option<String>,
    /// Additional attributes of the form element
    pub attrs: Attributes,
}

impl FormSettings {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: FormMethod) -> Self {
        self.method = method;
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value);
        self
    }
}

/// Hidden authenticity token input.
pub fn token_tag(token: &str) -> String {
    tag(
        "input",
        &Attributes::new()
            .with("type", "hidden")
            .with("name", "authenticity_token")
            .with("value", token),
    )
}

/// Hidden fields placed at the start of a form, without inline styles.
pub fn extra_tags_for_form(method: &FormMethod, token: Option<&str>) -> String {
    let token = token.map(token_tag);
    match method {
        FormMethod::Get => String::new(),
        FormMethod::Post => token
            .map(|t| content_tag("div", &t, &Attributes::new()))
            .unwrap_or_default(),
        FormMethod::Other(verb) => {
            let override_tag = tag(
                "input",
                &Attributes::new()
                    .with("type", "hidden")
                    .with("name", "_method")
                    .with("value", verb.as_str()),
            );
            content_tag(
                "div",
                &(override_tag + &token.unwrap_or_default()),
                &Attributes::new(),
            )
        }
    }
}

/// A complete form rendered with a builder of `style`.
pub fn form_for<'a, F>(
    formatter: &'a ValueFormatter,
    style: FormStyle,
    object_name: &str,
    object: Option<&'a dyn Record>,
    settings: &FormSettings,
    block: F,
) -> Result<String>
where
    F: FnOnce(&mut FormBuilder<'a>) -> Result<String>,
{
    let content = fields_for(formatter, style, object_name, object, block)?;

    let mut attrs = Attributes::new()
        .with("action", settings.action.as_str())
        .with("method", settings.method.form_method());
    attrs.merge(&settings.attrs);
    let extra = extra_tags_for_form(&settings.method, settings.token.as_deref());
    Ok(content_tag("form", &format!("{extra}{content}"), &attrs))
}

/// Form whose fields are laid out as a definition list.
pub fn dl_form_for<'a, F>(
    formatter: &'a ValueFormatter,
    object_name: &str,
    object: Option<&'a dyn Record>,
    settings: &FormSettings,
    block: F,
) -> Result<String>
where
    F: FnOnce(&mut FormBuilder<'a>) -> Result<String>,
{
    form_for(formatter, FormStyle::DefinitionList, object_name, object, settings, block)
}

/// Form whose fields are labeled divs.
pub fn labeled_form_for<'a, F>(
    formatter: &'a ValueFormatter,
    object_name: &str,
    object: Option<&'a dyn Record>,
    settings: &FormSettings,
    block: F,
) -> Result<String>
where
    F: FnOnce(&mut FormBuilder<'a>) -> Result<String>,
{
    form_for(formatter, FormStyle::Labeled, object_name, object, settings, block)
}

/// Fields of an object without a surrounding form element.
pub fn fields_for<'a, F>(
    formatter: &'a ValueFormatter,
    style: FormStyle,
    object_name: &str,
    object: Option<&'a dyn Record>,
    block: F,
) -> Result<String>
where
    F: FnOnce(&mut FormBuilder<'a>) -> Result<String>,
{
    let mut builder = FormBuilder::new(formatter, style, object_name, object);
    block(&mut builder)
}

pub fn dl_fields_for<'a, F>(
    formatter: &'a ValueFormatter,
    object_name: &str,
    object: Option<&'a dyn Record>,
    block: F,
) -> Result<String>
where
    F: FnOnce(&mut FormBuilder<'a>) -> Result<String>,
{
    fields_for(formatter, FormStyle::DefinitionList, object_name, object, block)
}

pub fn labeled_fields_for<'a, F>(
    formatter: &'a ValueFormatter,
    object_name: &str,
    object: Option<&'a dyn Record>,
    block: F,
) -> Result<String>
where
    F: FnOnce(&mut FormBuilder<'a>) -> Result<String>,
{
    fields_for(formatter, FormStyle::Labeled, object_name, object, block)
}

/// Split a comma separated setting into trimmed select choices.
pub fn make_select(values: Option<&str>) -> Option<Vec<String>> {
    make_select_with(values, |s| s.to_string())
}

/// Like [`make_select`], mapping every entry through `f`.
pub fn make_select_with<F>(values: Option<&str>, f: F) -> Option<Vec<String>>
where
    F: Fn(&str) -> String,
{
    values.map(|values| values.split(',').map(|s| f(s.trim())).collect())
}

/// [`make_select`] for settings read from JSON. Anything but a string or
/// null is an argument error.
pub fn make_select_json(values: &JsonValue) -> Result<Option<Vec<String>>> {
    match values {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(make_select(Some(s))),
        other => Err(RegaliaError::argument(
            "make_select",
            format!("expected a comma separated string, got {other}"),
        )),
    }
}
