//! Field wrappers
//!
//! [`tag_wrapper`] decides the final markup of a rendered field from the
//! render mode; outside tables and bundles the [`FormStyle`] of the builder
//! takes over.

use regalia_common::html::{content_tag, escape};
use regalia_common::Attributes;

use crate::context::{Align, ColumnHeader, RenderContext, RenderMode};

/// Layout of fields outside tables and bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStyle {
    /// `fieldset > dl > dt + dd`
    #[default]
    DefinitionList,
    /// `fieldset > div > label + input`
    Labeled,
}

/// Kind of the input being wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Password,
    Textarea,
    Select,
    Date,
    Checkbox,
    Radio,
    File,
    Static,
    Bundle,
}

/// Attributes of the wrapper elements around a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapOptions {
    /// Column alignment inside tables
    pub align: Option<Align>,
    pub td: Attributes,
    pub th: Attributes,
    pub dt: Attributes,
    pub dd: Attributes,
    pub label: Attributes,
    pub div: Attributes,
}

impl WrapOptions {
    /// Add classes to whichever element carries the value in the active
    /// style: `td`, `dd` or the labeled `div`.
    pub fn add_value_class(&mut self, classes: &str) -> &mut Self {
        self.td.add_class(classes);
        self.dd.add_class(classes);
        self.div.add_class(classes);
        self
    }
}

/// Wrap a rendered input according to the current render mode.
///
/// Bundles get the raw tags back and count one more element. Tables get a
/// `td` and, on their first row, a column header. Otherwise the style decides.
pub fn tag_wrapper(
    ctx: &mut RenderContext,
    style: FormStyle,
    title: &str,
    tags: &str,
    kind: InputKind,
    opts: &WrapOptions,
) -> String {
    match ctx.mode() {
        RenderMode::Bundle => {
            ctx.count_bundle_item();
            tags.to_string()
        }
        RenderMode::Table => {
            let mut header = ColumnHeader::new(title, opts.align.unwrap_or_default());
            header.attrs = opts.th.clone();
            ctx.record_header(header);

            let mut td = opts.td.clone();
            if let Some(align) = opts.align {
                td.insert_default("align", align.as_str());
            }
            content_tag("td", tags, &td)
        }
        RenderMode::None => style.wrap(title, tags, kind, opts),
    }
}

impl FormStyle {
    /// Plain-mode wrapper of the style.
    pub fn wrap(&self, title: &str, tags: &str, kind: InputKind, opts: &WrapOptions) -> String {
        let title = escape(title);
        match self {
            FormStyle::DefinitionList => {
                content_tag("dt", &title, &opts.dt) + &content_tag("dd", tags, &opts.dd)
            }
            FormStyle::Labeled => {
                let inner = if kind == InputKind::Checkbox {
                    // the label is the click target of the box
                    content_tag("label", &format!("{title}{tags}"), &opts.label)
                } else {
                    content_tag("label", &title, &opts.label) + tags
                };
                content_tag("div", &inner, &opts.div)
            }
        }
    }

    /// Fieldset around a section. Renders nothing for empty content.
    pub fn section(
        &self,
        title: Option<&str>,
        content: &str,
        fieldset: &Attributes,
        dl: &Attributes,
    ) -> String {
        if content.trim().is_empty() {
            return String::new();
        }
        let legend = title
            .filter(|t| !t.trim().is_empty())
            .map(|t| content_tag("legend", &escape(t), &Attributes::new()))
            .unwrap_or_default();
        let body = match self {
            FormStyle::DefinitionList => content_tag("dl", content, dl),
            FormStyle::Labeled => content.to_string(),
        };
        content_tag("fieldset", &format!("{legend}{body}"), fieldset)
    }

    /// Wrapper options of a finished bundle holding `count` fields.
    pub fn bundle_options(&self, attrs: &Attributes, count: usize) -> WrapOptions {
        let elements = format!("elements_{count}");
        let mut opts = WrapOptions::default();
        match self {
            FormStyle::DefinitionList => {
                opts.dt = attrs.clone();
                opts.dd.add_class(&elements);
            }
            FormStyle::Labeled => {
                opts.label = attrs.clone();
                opts.div.add_class(&elements);
            }
        }
        opts
    }
}
