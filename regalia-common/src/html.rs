//! HTML fragment emission
//!
//! Every helper in the workspace produces plain `String` fragments. Text that
//! comes from outside (titles, values, attribute values) is escaped here at
//! emit time; `inner_html` arguments are trusted markup that was produced by
//! another helper.
//!
//! CSS classes are collected in a [`ClassList`], an ordered set of tokens that
//! is only joined when the tag is written. Callers never append to a shared
//! class string.

use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// Non-breaking space, used to keep empty `dt`/`dd`/`td` cells valid.
pub const NBSP: &str = "&nbsp;";

/// Escape text for use as HTML element content.
pub fn escape(text: &str) -> String {
    html_escape::encode_safe(text).into_owned()
}

/// Whether `name` can be written as an attribute name without quoting.
pub fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

fn escape_attribute(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Ordered set of CSS class tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(IndexSet<String>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from a whitespace separated class string.
    pub fn parse(classes: &str) -> Self {
        let mut list = Self::new();
        list.push(classes);
        list
    }

    /// Append one or more whitespace separated tokens. Duplicates are ignored
    /// and keep their first position.
    pub fn push(&mut self, classes: &str) -> &mut Self {
        for token in classes.split_whitespace() {
            self.0.insert(token.to_string());
        }
        self
    }

    /// Builder-style variant of [`ClassList::push`].
    pub fn with(mut self, classes: &str) -> Self {
        self.push(classes);
        self
    }

    /// Append all tokens of another list.
    pub fn extend(&mut self, other: &ClassList) {
        for token in &other.0 {
            self.0.insert(token.clone());
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(" "))
    }
}

impl From<&str> for ClassList {
    fn from(classes: &str) -> Self {
        ClassList::parse(classes)
    }
}

/// Ordered HTML attributes of a single tag.
///
/// The `class` attribute is kept apart as a [`ClassList`] and written first.
/// All other attributes keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    classes: ClassList,
    attrs: IndexMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter. A `class` key is routed to the class list.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style class appender.
    pub fn with_class(mut self, classes: &str) -> Self {
        self.classes.push(classes);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if name == "class" {
            self.classes.push(&value);
        } else {
            self.attrs.insert(name.to_string(), value);
        }
        self
    }

    /// Set an attribute only when the caller did not already provide one.
    pub fn insert_default(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        if !self.attrs.contains_key(name) {
            self.attrs.insert(name.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassList {
        &mut self.classes
    }

    pub fn add_class(&mut self, classes: &str) -> &mut Self {
        self.classes.push(classes);
        self
    }

    /// Merge `other` into `self`: its attributes win, class tokens are unioned.
    pub fn merge(&mut self, other: &Attributes) {
        self.classes.extend(&other.classes);
        for (name, value) in &other.attrs {
            self.attrs.insert(name.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.attrs.is_empty()
    }

    /// Render as ` name="value"` pairs with a leading space, or an empty string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_attribute(&self.classes.to_string())));
        }
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
        }
        out
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name.as_ref(), value);
        }
        attrs
    }
}

/// Emit `<name attrs>inner_html</name>`.
pub fn content_tag(name: &str, inner_html: &str, attrs: &Attributes) -> String {
    format!("<{name}{}>{inner_html}</{name}>", attrs.render())
}

/// Emit a void element: `<name attrs />`.
pub fn tag(name: &str, attrs: &Attributes) -> String {
    format!("<{name}{} />", attrs.render())
}

/// Emit an anchor around already rendered markup.
pub fn link_to(inner_html: &str, href: &str, attrs: &Attributes) -> String {
    let mut all = Attributes::new().with("href", href);
    all.merge(attrs);
    content_tag("a", inner_html, &all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;&#x2F;b&gt;");
    }

    #[test]
    fn test_class_list_keeps_order_and_drops_duplicates() {
        let mut classes = ClassList::parse("rgt first");
        classes.push("first last");
        assert_eq!(classes.to_string(), "rgt first last");
        assert_eq!(classes.len(), 3);
    }

    #[test]
    fn test_attributes_render_class_first() {
        let attrs = Attributes::new()
            .with("name", "client[name]")
            .with_class("text")
            .with("value", "\"quoted\"");
        assert_eq!(
            attrs.render(),
            " class=\"text\" name=\"client[name]\" value=\"&quot;quoted&quot;\""
        );
    }

    #[test]
    fn test_merge_unions_classes() {
        let mut base = Attributes::new().with_class("right").with("align", "left");
        base.merge(&Attributes::new().with_class("money").with("align", "right"));
        assert_eq!(base.render(), " class=\"right money\" align=\"right\"");
    }

    #[test]
    fn test_merge_does_not_touch_the_source() {
        let shared = Attributes::new().with_class("rgt");
        let mut th = Attributes::new();
        th.merge(&shared);
        th.add_class("first");
        assert_eq!(shared.classes().to_string(), "rgt");
        assert_eq!(th.classes().to_string(), "rgt first");
    }

    #[test]
    fn test_insert_default() {
        let mut attrs = Attributes::new().with("size", "10");
        attrs.insert_default("size", "25").insert_default("maxlength", "40");
        assert_eq!(attrs.get("size"), Some("10"));
        assert_eq!(attrs.get("maxlength"), Some("40"));
    }

    #[test]
    fn test_attribute_names() {
        assert!(is_attribute_name("data-id"));
        assert!(is_attribute_name("aria-label"));
        assert!(!is_attribute_name(""));
        assert!(!is_attribute_name("x onclick=y"));
        assert!(!is_attribute_name("a\"b"));
        assert!(!is_attribute_name("x>"));
        assert!(!is_attribute_name("x/"));
    }

    #[test]
    fn test_tags() {
        let attrs = Attributes::new().with("type", "hidden");
        assert_eq!(tag("input", &attrs), "<input type=\"hidden\" />");
        assert_eq!(content_tag("dt", "Name", &Attributes::new()), "<dt>Name</dt>");
        assert_eq!(
            link_to("Show", "/clients/1", &Attributes::new()),
            "<a href=\"/clients/1\">Show</a>"
        );
    }
}
