//! Sortable tables over a collection of records
//!
//! [`ListHelper::table_for`] calls its block twice over: once with the first
//! record in [`TableMode::Header`] to collect the column headers, then once
//! per record in [`TableMode::Content`] to render the rows. The same block
//! describes both, so headers and cells cannot drift apart.

use std::mem;

use regalia_common::html::{content_tag, escape, link_to};
use regalia_common::{Attributes, Record, Result, Value};
use regalia_format::FormatOptions;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::helper::ListHelper;
use crate::params::Params;

/// Pass of a table render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Header,
    Content,
}

/// Link target of a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// The record's own URL
    Record,
    To(String),
}

impl Link {
    fn href(&self, object: &dyn Record) -> Option<String> {
        match self {
            Link::Record => object.url(),
            Link::To(href) => Some(href.clone()),
        }
        .filter(|href| !href.trim().is_empty())
    }
}

/// Table-wide options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Sort links in the column headers, on unless turned off
    pub sorting: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { sorting: true }
    }
}

impl TableOptions {
    pub fn unsorted() -> Self {
        Self { sorting: false }
    }
}

/// Options of one column.
#[derive(Clone, Default)]
pub struct ColumnOptions<'r> {
    /// Record to read instead of the current row's
    pub object: Option<&'r dyn Record>,
    pub title: Option<String>,
    /// Value formatted instead of the attribute
    pub value: Option<Value>,
    /// Ready markup used as the cell content
    pub content: Option<String>,
    /// Link the value, or leave the cell empty without a target
    pub link: Option<Link>,
    /// Link the value and mark the cell with `row_link`
    pub row_link: Option<Link>,
    /// Overrides the table's sorting setting for this column
    pub sorting: Option<bool>,
    /// Sort keys, defaulting to `{table_name}.{field}`
    pub sort_fields: Vec<String>,
    /// Classes for both the header and the cells
    pub class: Option<String>,
    pub th: Attributes,
    pub td: Attributes,
    pub format: FormatOptions,
}

impl<'r> ColumnOptions<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(mut self, object: &'r dyn Record) -> Self {
        self.object = Some(object);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn content(mut self, html: impl Into<String>) -> Self {
        self.content = Some(html.into());
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn row_link(mut self, link: Link) -> Self {
        self.row_link = Some(link);
        self
    }

    pub fn sorting(mut self, sorting: bool) -> Self {
        self.sorting = Some(sorting);
        self
    }

    pub fn sort_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn th(mut self, attrs: Attributes) -> Self {
        self.th = attrs;
        self
    }

    pub fn td(mut self, attrs: Attributes) -> Self {
        self.td = attrs;
        self
    }

    pub fn format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }
}

/// Column builder handed to the block of [`ListHelper::table_for`].
pub struct TableBuilder<'t> {
    helper: &'t ListHelper<'t>,
    mode: TableMode,
    record: &'t dyn Record,
    sorting: bool,
    headers: Vec<(String, Attributes)>,
}

impl<'t> TableBuilder<'t> {
    pub fn mode(&self) -> TableMode {
        self.mode
    }

    /// Record of the row being rendered.
    pub fn record(&self) -> &'t dyn Record {
        self.record
    }

    /// A data column. Renders a `td` in content mode; in header mode the
    /// header is collected and nothing is returned.
    pub fn column(&mut self, field: &str, opts: ColumnOptions<'_>) -> String {
        let object = opts.object.unwrap_or(self.record);
        match self.mode {
            TableMode::Header => {
                let header = self.header(object, field, &opts);
                self.headers.push(header);
                String::new()
            }
            TableMode::Content => self.cell(object, field, &opts),
        }
    }

    fn header(&self, object: &dyn Record, field: &str, opts: &ColumnOptions<'_>) -> (String, Attributes) {
        let formatter = self.helper.formatter();
        let model = object.model_name();
        let mut th = opts.th.clone();
        if let Some(class) = &opts.class {
            th.add_class(class);
        }
        let title = opts
            .title
            .clone()
            .unwrap_or_else(|| formatter.human_attribute_name(model, field));

        if !opts.sorting.unwrap_or(self.sorting) {
            return (escape(&title), th);
        }

        let sort_fields = if opts.sort_fields.is_empty() {
            format!("{}.{}", formatter.registry().table_name(model), field)
        } else {
            opts.sort_fields.join(",")
        };
        let request = self.helper.request();
        let sort = if request.get("sort") == Some("ASC") {
            "DESC"
        } else {
            "ASC"
        };
        if request.get("sort_by") == Some(sort_fields.as_str()) {
            th.add_class(if sort == "DESC" { "sortup" } else { "sortdown" });
        }

        let mut changes = Params::new();
        changes.insert("sort".into(), JsonValue::String(sort.into()));
        changes.insert("sort_by".into(), JsonValue::String(sort_fields));
        let href = request.change_params_url(&changes);
        (link_to(&escape(&title), &href, &Attributes::new()), th)
    }

    fn cell(&self, object: &dyn Record, field: &str, opts: &ColumnOptions<'_>) -> String {
        let mut td = opts.td.clone();
        if let Some(class) = &opts.class {
            td.add_class(class);
        }

        let mut value = match &opts.content {
            Some(html) => html.clone(),
            None => {
                let format = FormatOptions {
                    html: true,
                    ..opts.format.clone()
                };
                self.helper
                    .formatter()
                    .strfval(Some(object), field, opts.value.as_ref(), &format)
                    .unwrap_or_default()
            }
        };

        if let Some(link) = &opts.link {
            value = match link.href(object) {
                Some(href) if !value.trim().is_empty() => {
                    link_to(&value, &href, &Attributes::new())
                }
                _ => String::new(),
            };
        }
        if let Some(link) = &opts.row_link {
            if let Some(href) = link.href(object) {
                if !value.trim().is_empty() {
                    value = link_to(&value, &href, &Attributes::new());
                }
            }
            td.add_class("row_link");
        }
        content_tag("td", &value, &td)
    }

    /// A column of action links: a fixed `link.actions` header and the
    /// block's links inside `ul.actions`. Never sortable.
    pub fn action_column<F>(&mut self, td: &Attributes, block: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        match self.mode {
            TableMode::Header => {
                let title = self.helper.t_or_humanize("link.actions");
                self.headers
                    .push((escape(&title), Attributes::new().with("align", "left")));
                Ok(String::new())
            }
            TableMode::Content => {
                let mut td = td.clone();
                td.add_class("actions");
                let links = content_tag("ul", &block()?, &Attributes::new().with_class("actions"));
                Ok(content_tag("td", &links, &td))
            }
        }
    }
}

impl<'a> ListHelper<'a> {
    /// A table over `collection`, or nothing for an empty collection.
    ///
    /// The first header gets a `first` class, the last one of several a
    /// `last` class. Classes given by the caller are kept.
    pub fn table_for<'t, R, F>(
        &'t self,
        collection: &'t [R],
        opts: &TableOptions,
        attrs: &Attributes,
        mut block: F,
    ) -> Result<String>
    where
        R: Record,
        F: FnMut(&mut TableBuilder<'t>, &'t R) -> Result<String>,
    {
        let Some(first) = collection.first() else {
            return Ok(String::new());
        };

        let mut builder = TableBuilder {
            helper: self,
            mode: TableMode::Header,
            record: first,
            sorting: opts.sorting,
            headers: Vec::new(),
        };
        block(&mut builder, first)?;

        let headers = mem::take(&mut builder.headers);
        let last = headers.len().saturating_sub(1);
        let ths: String = headers
            .into_iter()
            .enumerate()
            .map(|(i, (title, mut th))| {
                if i == 0 {
                    th.add_class("first");
                } else if i == last {
                    th.add_class("last");
                }
                content_tag("th", &title, &th)
            })
            .collect();

        builder.mode = TableMode::Content;
        let mut rows = String::new();
        for record in collection {
            builder.record = record;
            let cells = block(&mut builder, record)?;
            rows.push_str(&content_tag("tr", &cells, &Attributes::new()));
        }
        debug!(rows = collection.len(), "rendered table");

        let thead = content_tag(
            "thead",
            &content_tag("tr", &ths, &Attributes::new()),
            &Attributes::new(),
        );
        let tbody = content_tag("tbody", &rows, &Attributes::new());
        Ok(content_tag("table", &format!("{thead}{tbody}"), attrs))
    }
}
