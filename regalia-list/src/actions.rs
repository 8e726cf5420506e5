//! Action links, buttons and small list helpers
//!
//! Actions render as `li` elements meant to be grouped by
//! [`ListHelper::action_group`] or a table's action column.

use regalia_common::html::{content_tag, escape, link_to, tag};
use regalia_common::{Attributes, Record, Result};
use regalia_form::{token_tag, FormMethod};

use crate::helper::ListHelper;

/// Action names whose icon title is translated under `link.{name}`.
const KNOWN_ACTIONS: [&str; 7] = ["edit", "pdf", "show", "delete", "copy", "comment", "send_email"];

/// A button submitting a one-field form, e.g. a status change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionButton {
    pub url: String,
    pub method: FormMethod,
    /// Button title and text
    pub title: String,
    /// Value of the hidden field, left out when blank
    pub value: Option<String>,
    pub class: Option<String>,
}

impl ActionButton {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: FormMethod) -> Self {
        self.method = method;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

impl<'a> ListHelper<'a> {
    /// A fieldset with an optional legend.
    pub fn section<F>(&self, caption: Option<&str>, attrs: &Attributes, block: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let legend = caption
            .filter(|c| !c.trim().is_empty())
            .map(|c| content_tag("legend", &escape(c), &Attributes::new()))
            .unwrap_or_default();
        Ok(content_tag("fieldset", &(legend + &block()?), attrs))
    }

    /// Buttons below a form, inside `div.form_actions`.
    pub fn form_actions<F>(&self, attrs: &Attributes, block: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let mut attrs = attrs.clone();
        attrs.add_class("form_actions");
        Ok(content_tag("div", &block()?, &attrs))
    }

    /// Actions inside `ul.actions`, preceded by a caption when one is given.
    pub fn action_group<F>(&self, caption: Option<&str>, attrs: &Attributes, block: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let caption = caption
            .filter(|c| !c.is_empty())
            .map(|c| content_tag("span", &escape(c), &Attributes::new().with_class("caption")))
            .unwrap_or_default();
        let mut attrs = attrs.clone();
        if attrs.classes().is_empty() {
            attrs.add_class("actions");
        }
        Ok(caption + &content_tag("ul", &block()?, &attrs))
    }

    /// An action shown as icon. The link text is meant to be hidden by CSS
    /// image replacement; the `li` gets the classes `icon` and `name`.
    pub fn action_icon(&self, name: &str, href: &str, li: &Attributes, link: &Attributes) -> String {
        let mut li = li.clone();
        if !li.contains("title") && KNOWN_ACTIONS.contains(&name) {
            li.insert("title", self.t_or_humanize(&format!("link.{name}")));
        }
        li.add_class("icon");
        li.add_class(name);
        let text = content_tag("span", &escape(name), &Attributes::new());
        content_tag("li", &link_to(&text, href, link), &li)
    }

    /// An action shown as text link, marked `active` when requested.
    pub fn action_text(
        &self,
        title: &str,
        href: &str,
        li: &Attributes,
        active: bool,
        link: &Attributes,
    ) -> String {
        let mut li = li.clone();
        if active {
            li.add_class("active");
        }
        content_tag("li", &link_to(&escape(title), href, link), &li)
    }

    /// An action button inside `li.form_btn`.
    pub fn action_button(&self, field_name: &str, button: &ActionButton, li: &Attributes) -> String {
        let mut li = li.clone();
        li.add_class("form_btn");
        content_tag("li", &self.mini_action_form(field_name, button), &li)
    }

    /// A form holding only a hidden `field_name` input and a submit button.
    ///
    /// `put` and `delete` are sent as post with a `_method` override. Post
    /// forms carry the request's authenticity token when there is one.
    pub fn mini_action_form(&self, field_name: &str, button: &ActionButton) -> String {
        let mut fields = String::new();
        if let FormMethod::Other(verb) = &button.method {
            if verb == "put" || verb == "delete" {
                fields.push_str(&tag(
                    "input",
                    &Attributes::new()
                        .with("type", "hidden")
                        .with("name", "_method")
                        .with("value", verb.as_str()),
                ));
            }
        }
        let form_method = button.method.form_method();
        if form_method == "post" {
            if let Some(token) = &self.request().token {
                fields.push_str(&token_tag(token));
            }
        }
        if let Some(value) = button.value.as_deref().filter(|v| !v.trim().is_empty()) {
            fields.push_str(&tag(
                "input",
                &Attributes::new()
                    .with("type", "hidden")
                    .with("name", field_name)
                    .with("value", value),
            ));
        }

        let mut attrs = Attributes::new()
            .with("type", "submit")
            .with("name", "submit")
            .with("title", button.title.as_str());
        if let Some(class) = &button.class {
            attrs.add_class(class);
        }
        let text = content_tag("span", &escape(&button.title), &Attributes::new());
        fields.push_str(&content_tag("button", &text, &attrs));

        let form = Attributes::new()
            .with("method", form_method)
            .with("action", button.url.as_str());
        content_tag(
            "form",
            &content_tag("div", &fields, &Attributes::new()),
            &form,
        )
    }

    /// An ordered list with alternating `odd`/`even` items, or a paragraph
    /// with the `list.empty` text for an empty collection. Descending lists
    /// number their items from the collection size down.
    pub fn ordered_list_for<R, F>(
        &self,
        collection: &[R],
        descending: bool,
        attrs: &Attributes,
        mut block: F,
    ) -> Result<String>
    where
        R: Record,
        F: FnMut(&R) -> Result<String>,
    {
        if collection.is_empty() {
            let empty = self.t_or_humanize("list.empty");
            return Ok(content_tag("p", &escape(&empty), &Attributes::new()));
        }

        let mut items = String::new();
        for (i, record) in collection.iter().enumerate() {
            let mut li = Attributes::new().with_class(if i % 2 == 0 { "odd" } else { "even" });
            if descending {
                li.insert("value", (collection.len() - i).to_string());
            }
            items.push_str(&content_tag("li", &block(record)?, &li));
        }
        Ok(content_tag("ol", &items, attrs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RequestParams;
    use regalia_common::{Catalog, PlainRecord};
    use regalia_format::{FieldKindRegistry, FormatConfig, ValueFormatter};
    use std::sync::Arc;

    fn formatter() -> ValueFormatter {
        let catalog = Catalog::new("en")
            .with("link.edit", "Edit")
            .with("list.empty", "Nothing found");
        ValueFormatter::new(
            Arc::new(FieldKindRegistry::new()),
            Arc::new(catalog),
            FormatConfig::default(),
        )
    }

    #[test]
    fn test_action_group_with_icons_and_text() {
        let formatter = formatter();
        let helper = ListHelper::new(&formatter, RequestParams::new("/users"));
        let html = helper
            .action_group(Some("Client"), &Attributes::new(), || {
                let mut out = helper.action_icon("edit", "/users/1/edit", &Attributes::new(), &Attributes::new());
                out += &helper.action_icon(
                    "invoice_add",
                    "/users/1/invoices/new",
                    &Attributes::new().with("title", "New Invoice"),
                    &Attributes::new(),
                );
                out += &helper.action_text("All", "/users", &Attributes::new(), true, &Attributes::new());
                Ok(out)
            })
            .unwrap();
        assert_eq!(
            html,
            "<span class=\"caption\">Client</span><ul class=\"actions\">\
             <li class=\"icon edit\" title=\"Edit\"><a href=\"/users/1/edit\"><span>edit</span></a></li>\
             <li class=\"icon invoice_add\" title=\"New Invoice\"><a href=\"/users/1/invoices/new\"><span>invoice_add</span></a></li>\
             <li class=\"active\"><a href=\"/users\">All</a></li></ul>"
        );
    }

    #[test]
    fn test_action_button_with_method_override_and_token() {
        let formatter = formatter();
        let helper = ListHelper::new(&formatter, RequestParams::new("/orders").token("t0k3n"));
        let button = ActionButton::new("/orders/1", "Open")
            .method(FormMethod::parse("put"))
            .value("open")
            .class("status");
        assert_eq!(
            helper.action_button("order[status]", &button, &Attributes::new()),
            "<li class=\"form_btn\"><form method=\"post\" action=\"/orders/1\"><div>\
             <input type=\"hidden\" name=\"_method\" value=\"put\" />\
             <input type=\"hidden\" name=\"authenticity_token\" value=\"t0k3n\" />\
             <input type=\"hidden\" name=\"order[status]\" value=\"open\" />\
             <button class=\"status\" type=\"submit\" name=\"submit\" title=\"Open\"><span>Open</span></button>\
             </div></form></li>"
        );
    }

    #[test]
    fn test_get_forms_skip_token_and_blank_values() {
        let formatter = formatter();
        let helper = ListHelper::new(&formatter, RequestParams::new("/orders").token("t0k3n"));
        let button = ActionButton::new("/orders", "Search").method(FormMethod::Get).value(" ");
        let html = helper.mini_action_form("q", &button);
        assert!(html.starts_with("<form method=\"get\" action=\"/orders\"><div><button"));
        assert!(!html.contains("authenticity_token"));
        assert!(!html.contains("type=\"hidden\""));
    }

    #[test]
    fn test_section_and_form_actions() {
        let formatter = formatter();
        let helper = ListHelper::new(&formatter, RequestParams::new("/"));
        assert_eq!(
            helper
                .section(Some("Details"), &Attributes::new(), || Ok("<p>x</p>".into()))
                .unwrap(),
            "<fieldset><legend>Details</legend><p>x</p></fieldset>"
        );
        assert_eq!(
            helper.section(None, &Attributes::new(), || Ok(String::new())).unwrap(),
            "<fieldset></fieldset>"
        );
        assert_eq!(
            helper
                .form_actions(&Attributes::new().with_class("wide"), || Ok("ok".into()))
                .unwrap(),
            "<div class=\"wide form_actions\">ok</div>"
        );
    }

    #[test]
    fn test_ordered_list_for() {
        let formatter = formatter();
        let helper = ListHelper::new(&formatter, RequestParams::new("/"));
        let notes: Vec<PlainRecord> = ["a", "b", "c"]
            .iter()
            .map(|text| PlainRecord::new("Note").with("text", *text))
            .collect();
        let html = helper
            .ordered_list_for(&notes, true, &Attributes::new(), |note| {
                Ok(note.attribute("text").map(|v| v.to_param()).unwrap_or_default())
            })
            .unwrap();
        assert_eq!(
            html,
            "<ol><li class=\"odd\" value=\"3\">a</li><li class=\"even\" value=\"2\">b</li>\
             <li class=\"odd\" value=\"1\">c</li></ol>"
        );

        let none: Vec<PlainRecord> = Vec::new();
        let html = helper
            .ordered_list_for(&none, false, &Attributes::new(), |_| Ok(String::new()))
            .unwrap();
        assert_eq!(html, "<p>Nothing found</p>");
    }
}
