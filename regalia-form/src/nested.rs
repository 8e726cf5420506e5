//! Forms for associated records
//!
//! Each associated record gets a child builder of the same style named
//! `{parent}[{association}_attributes][{index}]`. The child shares the render
//! context of its parent, so a nested form inside a table or bundle keeps
//! contributing headers and bundle counts.

use std::mem;

use regalia_common::{Record, Result};
use tracing::debug;

use crate::builder::FormBuilder;
use crate::options::FieldOptions;

/// Options of [`FormBuilder::render_nested_form`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedFormOptions {
    /// Build blank records until this many unsaved ones exist
    pub new: usize,
    /// Association name instead of the first record's model key
    pub name: Option<String>,
    /// Positions of records to leave out
    pub skip: Vec<usize>,
}

impl NestedFormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prebuild(mut self, count: usize) -> Self {
        self.new = count;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn skip(mut self, index: usize) -> Self {
        self.skip.push(index);
        self
    }
}

impl<'a> FormBuilder<'a> {
    /// Association used in the nested parameter name: `name` itself when the
    /// builder's model accepts nested attributes for it, else its plural.
    fn association_name(&self, name: &str) -> String {
        if self
            .formatter()
            .registry()
            .accepts_nested_attributes(self.model_name(), name)
        {
            name.to_string()
        } else {
            format!("{name}s")
        }
    }

    /// Render `block` once per associated record.
    ///
    /// `build` creates the blank records requested by [`NestedFormOptions::new`];
    /// they are appended to `records`. Skipped records keep their position,
    /// so indices in the parameter names always match the collection.
    /// Persisted records get a hidden `id` input after their fields. An empty
    /// collection renders nothing.
    pub fn render_nested_form<R, B, F>(
        &mut self,
        records: &mut Vec<R>,
        opts: &NestedFormOptions,
        mut build: B,
        mut block: F,
    ) -> Result<String>
    where
        R: Record,
        B: FnMut() -> R,
        F: FnMut(&mut FormBuilder<'_>, &R) -> Result<String>,
    {
        let unsaved = records.iter().filter(|r| r.is_new_record()).count();
        let built = opts.new.saturating_sub(unsaved);
        records.extend((0..built).map(|_| build()));

        let Some(first) = records.first() else {
            return Ok(String::new());
        };
        let name = match &opts.name {
            Some(name) => name.clone(),
            None => self
                .formatter()
                .registry()
                .i18n_keys(first.model_name())
                .into_iter()
                .next()
                .unwrap_or_default(),
        };
        let association = self.association_name(&name);

        let mut output = String::new();
        let mut rendered = 0;
        for (index, record) in records.iter().enumerate() {
            if opts.skip.contains(&index) {
                continue;
            }
            let child_name = format!("{}[{}_attributes][{}]", self.object_name(), association, index);
            let mut child = FormBuilder::new(self.formatter(), self.style(), child_name, Some(record));
            child.ctx = mem::take(&mut self.ctx);

            let result = block(&mut child, record).and_then(|mut html| {
                if !record.is_new_record() {
                    if let Some(id) = record.id() {
                        html.push_str(&child.hidden("id", FieldOptions::new().value(id))?);
                    }
                }
                Ok(html)
            });
            self.ctx = mem::take(&mut child.ctx);
            output.push_str(&result?);
            rendered += 1;
        }

        debug!(
            association = %association,
            rendered,
            skipped = records.len() - rendered,
            built,
            "rendered nested form"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::FormStyle;
    use regalia_common::{Attributes, Catalog, PlainRecord};
    use regalia_format::{FieldKindRegistry, FormatConfig, ModelDef, ValueFormatter};
    use std::sync::Arc;

    fn formatter() -> ValueFormatter {
        let registry = FieldKindRegistry::new()
            .with_model(ModelDef::new("Invoice").accepts_nested_attributes_for("line_items"))
            .unwrap()
            .with_model(ModelDef::new("LineItem"))
            .unwrap();
        ValueFormatter::new(
            Arc::new(registry),
            Arc::new(Catalog::new("en")),
            FormatConfig::default(),
        )
    }

    fn line_item(id: i64, name: &str) -> PlainRecord {
        PlainRecord::new("LineItem").with("id", id).with("name", name)
    }

    #[test]
    fn test_child_names_and_hidden_ids() {
        let formatter = formatter();
        let invoice = PlainRecord::new("Invoice");
        let mut f = FormBuilder::new(&formatter, FormStyle::DefinitionList, "invoice", Some(&invoice));
        let mut items = vec![line_item(7, "Paper"), line_item(8, "Ink")];

        let html = f
            .render_nested_form(
                &mut items,
                &NestedFormOptions::new().skip(0),
                || PlainRecord::new_record("LineItem"),
                |f, _| f.text("name", FieldOptions::new().no_info()),
            )
            .unwrap();

        assert!(!html.contains("Paper"));
        assert!(html.contains("name=\"invoice[line_items_attributes][1][name]\""));
        assert!(html.contains("id=\"invoice_line_items_attributes_1_name\""));
        assert!(html.ends_with(
            "<input type=\"hidden\" id=\"invoice_line_items_attributes_1_id\" \
             name=\"invoice[line_items_attributes][1][id]\" value=\"8\" />"
        ));
    }

    #[test]
    fn test_prebuilds_blank_records() {
        let formatter = formatter();
        let invoice = PlainRecord::new("Invoice");
        let mut f = FormBuilder::new(&formatter, FormStyle::DefinitionList, "invoice", Some(&invoice));
        let mut items = vec![line_item(7, "Paper"), PlainRecord::new_record("LineItem")];

        let html = f
            .render_nested_form(
                &mut items,
                &NestedFormOptions::new().prebuild(3),
                || PlainRecord::new_record("LineItem"),
                |f, _| f.text("name", FieldOptions::new().no_info()),
            )
            .unwrap();

        assert_eq!(items.len(), 4);
        assert!(html.contains("invoice[line_items_attributes][3][name]"));
        assert_eq!(html.matches("type=\"hidden\"").count(), 1);
    }

    #[test]
    fn test_association_name_falls_back_to_plural() {
        let formatter = formatter();
        let mut f = FormBuilder::new(&formatter, FormStyle::Labeled, "invoice", None);
        let mut notes = vec![PlainRecord::new_record("Note")];

        let html = f
            .render_nested_form(
                &mut notes,
                &NestedFormOptions::new(),
                || PlainRecord::new_record("Note"),
                |f, _| f.memo("body", FieldOptions::new().no_info()),
            )
            .unwrap();
        assert!(html.contains("name=\"invoice[notes_attributes][0][body]\""));

        let html = f
            .render_nested_form(
                &mut notes,
                &NestedFormOptions::new().name("remark"),
                || PlainRecord::new_record("Note"),
                |f, _| f.memo("body", FieldOptions::new().no_info()),
            )
            .unwrap();
        assert!(html.contains("name=\"invoice[remarks_attributes][0][body]\""));
    }

    #[test]
    fn test_empty_collection_renders_nothing() {
        let formatter = formatter();
        let mut f = FormBuilder::new(&formatter, FormStyle::DefinitionList, "invoice", None);
        let mut items: Vec<PlainRecord> = Vec::new();
        let html = f
            .render_nested_form(
                &mut items,
                &NestedFormOptions::new(),
                || PlainRecord::new_record("LineItem"),
                |f, _| f.text("name", FieldOptions::new()),
            )
            .unwrap();
        assert_eq!(html, "");
    }

    #[test]
    fn test_nested_fields_join_the_parent_table() {
        let formatter = formatter();
        let invoice = PlainRecord::new("Invoice");
        let mut f = FormBuilder::new(&formatter, FormStyle::DefinitionList, "invoice", Some(&invoice));
        let mut items = vec![line_item(1, "Paper"), line_item(2, "Ink")];

        let html = f
            .table("Items", &Attributes::new(), |f| {
                let mut rows = String::new();
                for i in 0..items.len() {
                    rows += &f.table_row(|f| {
                        f.render_nested_form(
                            &mut items,
                            &NestedFormOptions::new().skip(1 - i),
                            || PlainRecord::new_record("LineItem"),
                            |f, _| f.static_text("name", FieldOptions::new()),
                        )
                    })?;
                }
                Ok(rows)
            })
            .unwrap();

        assert_eq!(html.matches("</th>").count(), 1);
        assert!(html.contains("<th class=\"first\" align=\"left\">Name</th>"));
        assert!(html.contains("<td>Paper</td>"));
        assert!(html.contains("<td>Ink</td>"));
    }
}
