//! Definition lists showing the attributes of one record

use regalia_common::html::{content_tag, escape, link_to, NBSP};
use regalia_common::{Attributes, Record, RegaliaError, Result, Value};
use regalia_format::FormatOptions;

use crate::helper::ListHelper;

/// Options of a single [`ShowBuilder::show`] call.
#[derive(Clone, Default)]
pub struct ShowOptions<'r> {
    /// Record to read instead of the list's
    pub object: Option<&'r dyn Record>,
    /// `dt` text instead of the translated attribute name
    pub caption: Option<String>,
    /// Value formatted instead of the attribute
    pub value: Option<Value>,
    /// Ready markup used as the `dd` content
    pub content: Option<String>,
    pub link: Option<String>,
    /// Attributes for both `dt` and `dd`, unless those are given separately
    pub attrs: Attributes,
    pub dt: Option<Attributes>,
    pub dd: Option<Attributes>,
    pub format: FormatOptions,
}

impl<'r> ShowOptions<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(mut self, object: &'r dyn Record) -> Self {
        self.object = Some(object);
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
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

    pub fn link(mut self, href: impl Into<String>) -> Self {
        self.link = Some(href.into());
        self
    }

    pub fn class(mut self, classes: &str) -> Self {
        self.attrs.add_class(classes);
        self
    }

    pub fn dt(mut self, attrs: Attributes) -> Self {
        self.dt = Some(attrs);
        self
    }

    pub fn dd(mut self, attrs: Attributes) -> Self {
        self.dd = Some(attrs);
        self
    }

    pub fn format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }
}

/// Builder handed to the block of [`ListHelper::dl_for`].
pub struct ShowBuilder<'a> {
    helper: &'a ListHelper<'a>,
    object_name: String,
    object: Option<&'a dyn Record>,
}

impl<'a> ShowBuilder<'a> {
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// A `dt`/`dd` pair for `field`. Blank captions and values render as
    /// `&nbsp;`.
    pub fn show(&self, field: &str, opts: ShowOptions<'_>) -> String {
        let object = opts.object.or(self.object);
        let caption = match &opts.caption {
            Some(caption) => caption.clone(),
            None => {
                let model = object.map_or(self.object_name.as_str(), |o| o.model_name());
                self.helper.formatter().human_attribute_name(model, field)
            }
        };
        let value = match &opts.content {
            Some(html) => html.clone(),
            None => {
                let format = FormatOptions {
                    html: true,
                    ..opts.format.clone()
                };
                self.helper
                    .formatter()
                    .strfval(object, field, opts.value.as_ref(), &format)
                    .unwrap_or_default()
            }
        };
        self.pair(&caption, value, &opts)
    }

    /// A `dt`/`dd` pair without a field. Both caption and value are required.
    pub fn show_short(&self, opts: ShowOptions<'_>) -> Result<String> {
        let Some(caption) = opts.caption.clone() else {
            return Err(RegaliaError::argument("show", "caption is required without a field"));
        };
        let value = match (&opts.content, &opts.value) {
            (Some(html), _) => html.clone(),
            (None, Some(value)) => {
                let format = FormatOptions {
                    html: true,
                    ..opts.format.clone()
                };
                self.helper
                    .formatter()
                    .strfval(None, "", Some(value), &format)
                    .unwrap_or_default()
            }
            (None, None) => {
                return Err(RegaliaError::argument("show", "value is required without a field"))
            }
        };
        Ok(self.pair(&caption, value, &opts))
    }

    fn pair(&self, caption: &str, mut value: String, opts: &ShowOptions<'_>) -> String {
        if let Some(href) = &opts.link {
            value = link_to(&value, href, &Attributes::new());
        }
        let caption = if caption.trim().is_empty() {
            NBSP.to_string()
        } else {
            escape(caption)
        };
        if value.trim().is_empty() {
            value = NBSP.to_string();
        }
        let dt = opts.dt.as_ref().unwrap_or(&opts.attrs);
        let dd = opts.dd.as_ref().unwrap_or(&opts.attrs);
        content_tag("dt", &caption, dt) + &content_tag("dd", &value, dd)
    }
}

impl<'a> ListHelper<'a> {
    /// A definition list of one record's attributes.
    pub fn dl_for<'t, F>(
        &'t self,
        object_name: &str,
        object: Option<&'t dyn Record>,
        attrs: &Attributes,
        block: F,
    ) -> Result<String>
    where
        F: FnOnce(&ShowBuilder<'t>) -> Result<String>,
    {
        let builder = ShowBuilder {
            helper: self,
            object_name: object_name.to_string(),
            object,
        };
        Ok(content_tag("dl", &block(&builder)?, attrs))
    }
}
