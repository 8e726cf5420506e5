//! Form builder
//!
//! A [`FormBuilder`] is bound to one object name and, optionally, one record.
//! It owns its [`RenderContext`], so table and bundle state never leaks
//! between builders. Field methods live in [`crate::fields`].
//!
//! Blocks are closures receiving the builder and returning the captured
//! markup:
//!
//! ```
//! use std::sync::Arc;
//! use regalia_common::{Catalog, PlainRecord};
//! use regalia_format::{FieldKindRegistry, FormatConfig, ValueFormatter};
//! use regalia_form::{FieldOptions, FormBuilder, FormStyle};
//!
//! let formatter = ValueFormatter::new(
//!     Arc::new(FieldKindRegistry::new()),
//!     Arc::new(Catalog::new("en")),
//!     FormatConfig::default(),
//! );
//! let client = PlainRecord::new("Client").with("name", "ACME");
//! let mut f = FormBuilder::new(&formatter, FormStyle::DefinitionList, "client", Some(&client));
//! let html = f
//!     .section(Some("Client"), &Default::default(), |f| {
//!         f.text("name", FieldOptions::new().no_info())
//!     })
//!     .unwrap();
//! assert!(html.starts_with("<fieldset><legend>Client</legend><dl><dt>Name</dt>"));
//! ```

use once_cell::sync::Lazy;
use regalia_common::html::{content_tag, escape};
use regalia_common::{Attributes, Record, Result, Value};
use regalia_format::{FieldKind, ValueFormatter};
use regex::Regex;

use crate::context::{RenderContext, RenderMode};
use crate::options::{FieldName, FieldOptions, Info};
use crate::wrapper::{self, FormStyle, InputKind, WrapOptions};

static ID_UNSAFE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\]\[|[^-a-zA-Z0-9:.]").expect("Failed to compile id sanitizing regex")
});

/// Turn an object or field name into a DOM id fragment:
/// `client[address_attributes][0]` becomes `client_address_attributes_0`.
pub fn sanitize_id(name: &str) -> String {
    let replaced = ID_UNSAFE.replace_all(name, "_");
    replaced.trim_end_matches('_').to_string()
}

/// Display kind of a field, from its value and its declared kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Plain,
    Money,
    Percent,
    Date,
    Enum,
    Boolean,
}

/// Resolved facts about one field call.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub title: String,
    /// Explicit value, else the record's attribute, else null
    pub value: Value,
    pub kind: MetadataKind,
}

/// Attributes of the `fieldset` and the definition list of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionOptions {
    pub fieldset: Attributes,
    pub dl: Attributes,
}

/// Builder for the fields of one object.
pub struct FormBuilder<'a> {
    formatter: &'a ValueFormatter,
    style: FormStyle,
    object_name: String,
    object: Option<&'a dyn Record>,
    pub(crate) ctx: RenderContext,
}

impl<'a> FormBuilder<'a> {
    pub fn new(
        formatter: &'a ValueFormatter,
        style: FormStyle,
        object_name: impl Into<String>,
        object: Option<&'a dyn Record>,
    ) -> Self {
        Self {
            formatter,
            style,
            object_name: object_name.into(),
            object,
            ctx: RenderContext::new(),
        }
    }

    pub fn formatter(&self) -> &'a ValueFormatter {
        self.formatter
    }

    pub fn style(&self) -> FormStyle {
        self.style
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn object(&self) -> Option<&'a dyn Record> {
        self.object
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Model used for translations and field kinds: the record's model, or
    /// the object name when the builder has no record.
    pub fn model_name(&self) -> &str {
        match self.object {
            Some(object) => object.model_name(),
            None => &self.object_name,
        }
    }

    /// Whether `field` is declared with `kind` on the builder's model.
    pub fn is_kind(&self, kind: FieldKind, field: &str) -> bool {
        self.formatter
            .registry()
            .is_kind(self.model_name(), kind, field)
    }

    /// Translated caption of an attribute; raw names are their own caption.
    pub fn build_title(&self, name: &FieldName) -> String {
        match name {
            FieldName::Attribute(field) => self
                .formatter
                .human_attribute_name(self.model_name(), field),
            FieldName::Raw(raw) => raw.clone(),
        }
    }

    /// Current value of a field, read from the record.
    pub fn current_value(&self, field: &str) -> Value {
        self.object
            .and_then(|object| object.attribute(field))
            .unwrap_or(Value::Null)
    }

    /// Resolve title, value and display kind of a field call.
    pub fn describe(&self, name: &FieldName, opts: &FieldOptions) -> FieldDescriptor {
        let title = opts.title.clone().unwrap_or_else(|| self.build_title(name));
        let value = opts
            .value
            .clone()
            .unwrap_or_else(|| self.current_value(name.as_str()));
        let field = name.as_str();
        let kind = match &value {
            Value::Enum(_) => MetadataKind::Enum,
            Value::Bool(_) => MetadataKind::Boolean,
            Value::Date(_) | Value::DateTime(_) => MetadataKind::Date,
            _ if self.is_kind(FieldKind::Percent, field) => MetadataKind::Percent,
            _ if self.is_kind(FieldKind::Money, field) => MetadataKind::Money,
            _ if self.is_kind(FieldKind::Date, field) => MetadataKind::Date,
            _ => MetadataKind::Plain,
        };
        FieldDescriptor {
            name: name.clone(),
            title,
            value,
            kind,
        }
    }

    /// Submitted name of an input: `object[field]` for attributes.
    pub fn input_name(&self, name: &FieldName) -> String {
        match name {
            FieldName::Attribute(field) => format!("{}[{}]", self.object_name, field),
            FieldName::Raw(raw) => raw.clone(),
        }
    }

    /// DOM id of an input. Raw names get none.
    pub fn input_id(&self, name: &FieldName) -> Option<String> {
        match name {
            FieldName::Attribute(field) if self.object.is_some() => Some(format!(
                "{}_{}",
                sanitize_id(&self.object_name),
                sanitize_id(field)
            )),
            FieldName::Attribute(field) => Some(sanitize_id(field)),
            FieldName::Raw(_) => None,
        }
    }

    /// Info annotation after an input, `""` when there is nothing to show.
    pub fn info_tag(&self, info: &Info, name: &FieldName) -> String {
        let text = match info {
            Info::None => None,
            Info::Text(text) => Some(text.clone()),
            Info::Key(key) => self.lookup_info(key),
            Info::Auto => match name {
                FieldName::Attribute(field) => self.lookup_info(field),
                FieldName::Raw(_) => None,
            },
        };
        text.filter(|t| !t.trim().is_empty())
            .map(|t| content_tag("div", &t, &Attributes::new().with_class("info")))
            .unwrap_or_default()
    }

    fn lookup_info(&self, key: &str) -> Option<String> {
        let scope = &self.formatter.config().i18n_scope;
        let keys: Vec<String> = self
            .formatter
            .registry()
            .i18n_keys(self.model_name())
            .iter()
            .flat_map(|model| {
                [
                    format!("{scope}.attributes.{model}.{key}_info_html"),
                    format!("{scope}.attributes.{model}.{key}_info"),
                ]
            })
            .collect();
        self.formatter.translator().translate(&keys)
    }

    /// Wrap a rendered input according to the render mode and style.
    pub fn tag_wrapper(
        &mut self,
        title: &str,
        tags: &str,
        kind: InputKind,
        opts: &WrapOptions,
    ) -> String {
        wrapper::tag_wrapper(&mut self.ctx, self.style, title, tags, kind, opts)
    }

    /// A fieldset grouping related fields. Empty blocks render nothing.
    pub fn section<F>(&mut self, title: Option<&str>, opts: &SectionOptions, block: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        let content = block(self)?;
        Ok(self.style.section(title, &content, &opts.fieldset, &opts.dl))
    }

    /// Several inputs in one wrapper. The value element carries an
    /// `elements_{n}` class with the number of wrapped fields.
    pub fn bundle<F>(&mut self, title: &str, attrs: &Attributes, block: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        let frame = self.ctx.enter_bundle();
        let captured = block(self);
        let count = self.ctx.exit_bundle(frame);
        let tags = captured?;

        let opts = if self.ctx.mode() == RenderMode::Table {
            WrapOptions::default()
        } else {
            self.style.bundle_options(attrs, count)
        };
        Ok(self.tag_wrapper(title, &tags, InputKind::Bundle, &opts))
    }

    /// A table whose header row is collected from the fields of its first
    /// [`FormBuilder::table_row`].
    pub fn table<F>(&mut self, title: &str, attrs: &Attributes, block: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        let frame = self.ctx.enter_table();
        let captured = block(self);
        let headers = self.ctx.exit_table(frame);
        let content = captured?;

        let last = headers.len().saturating_sub(1);
        let ths: String = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let mut th = header.attrs.clone();
                th.insert_default("align", header.align.as_str());
                if i == 0 {
                    th.add_class("first");
                } else if i == last {
                    th.add_class("last");
                }
                content_tag("th", &escape(&header.title), &th)
            })
            .collect();

        let mut table_attrs = Attributes::new().with("summary", title);
        table_attrs.merge(attrs);
        let thead = content_tag(
            "thead",
            &content_tag("tr", &ths, &Attributes::new()),
            &Attributes::new(),
        );
        let tbody = content_tag("tbody", &content, &Attributes::new());
        Ok(content_tag("table", &format!("{thead}{tbody}"), &table_attrs))
    }

    /// One row of a [`FormBuilder::table`].
    pub fn table_row<F>(&mut self, block: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        self.ctx.next_row();
        let content = block(self)?;
        Ok(content_tag("tr", &content, &Attributes::new()))
    }

    /// Action links or buttons: `td.actions` inside tables, `div.actions`
    /// everywhere else.
    pub fn actions<F>(&mut self, attrs: &Attributes, block: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        let content = block(self)?;
        let mut all = attrs.clone();
        if all.classes().is_empty() {
            all.add_class("actions");
        }
        let name = if self.ctx.mode() == RenderMode::Table {
            "td"
        } else {
            "div"
        };
        Ok(content_tag(name, &content, &all))
    }
}
