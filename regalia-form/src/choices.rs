//! Select box choices
//!
//! A [`ChoiceSet`] accepts the four shapes choices usually come in and
//! normalizes them into `(label, value)` options without touching the
//! caller's data.

use indexmap::IndexMap;
use regalia_common::html::{content_tag, escape};
use regalia_common::{Attributes, Record};

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Choices of a selection field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceSet {
    /// Label and value are the same string
    Flat(Vec<String>),
    /// `(label, value)` pairs in the given order
    Pairs(Vec<(String, String)>),
    /// Label → value mapping, offered sorted by label
    Map(IndexMap<String, String>),
    /// Domain objects: the record id is the value, its display label the text.
    /// Offered sorted by label.
    Records(Vec<SelectOption>),
}

impl ChoiceSet {
    pub fn flat<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ChoiceSet::Flat(items.into_iter().map(Into::into).collect())
    }

    pub fn pairs<I, L, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        ChoiceSet::Pairs(
            items
                .into_iter()
                .map(|(l, v)| (l.into(), v.into()))
                .collect(),
        )
    }

    pub fn map<I, L, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        ChoiceSet::Map(
            items
                .into_iter()
                .map(|(l, v)| (l.into(), v.into()))
                .collect(),
        )
    }

    /// Snapshot a collection of records as choices.
    pub fn records<'r, I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = &'r R>,
        R: Record + ?Sized + 'r,
    {
        ChoiceSet::Records(
            records
                .into_iter()
                .map(|r| SelectOption::new(r.display_label(), r.id().unwrap_or_default()))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChoiceSet::Flat(items) => items.is_empty(),
            ChoiceSet::Pairs(items) => items.is_empty(),
            ChoiceSet::Map(items) => items.is_empty(),
            ChoiceSet::Records(items) => items.is_empty(),
        }
    }

    /// Normalized options in display order.
    pub fn options(&self) -> Vec<SelectOption> {
        match self {
            ChoiceSet::Flat(items) => items
                .iter()
                .map(|s| SelectOption::new(s.clone(), s.clone()))
                .collect(),
            ChoiceSet::Pairs(items) => items
                .iter()
                .map(|(l, v)| SelectOption::new(l.clone(), v.clone()))
                .collect(),
            ChoiceSet::Map(items) => {
                let mut options: Vec<SelectOption> = items
                    .iter()
                    .map(|(l, v)| SelectOption::new(l.clone(), v.clone()))
                    .collect();
                options.sort_by(|a, b| a.label.cmp(&b.label));
                options
            }
            ChoiceSet::Records(items) => {
                let mut options = items.clone();
                options.sort_by(|a, b| a.label.cmp(&b.label));
                options
            }
        }
    }
}

/// Render `<option>` tags, marking every value contained in `selected`.
pub fn options_for_select(options: &[SelectOption], selected: &[String]) -> String {
    options
        .iter()
        .map(|opt| {
            let mut attrs = Attributes::new().with("value", opt.value.as_str());
            if selected.iter().any(|s| s == &opt.value) {
                attrs.insert("selected", "selected");
            }
            content_tag("option", &escape(&opt.label), &attrs)
        })
        .collect()
}

/// The empty leading option of a select with a blank choice.
pub fn blank_option() -> String {
    content_tag("option", "", &Attributes::new().with("value", ""))
}

/// A labeled group of choices for a grouped select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    pub label: String,
    pub choices: ChoiceSet,
}

impl OptionGroup {
    pub fn new(label: impl Into<String>, choices: ChoiceSet) -> Self {
        Self {
            label: label.into(),
            choices,
        }
    }
}

/// Render `<optgroup>` tags in the given order, leaving out empty groups.
pub fn grouped_options_for_select(groups: &[OptionGroup], selected: &[String]) -> String {
    groups
        .iter()
        .filter(|group| !group.choices.is_empty())
        .map(|group| {
            content_tag(
                "optgroup",
                &options_for_select(&group.choices.options(), selected),
                &Attributes::new().with("label", group.label.as_str()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regalia_common::PlainRecord;

    #[test]
    fn test_flat_and_pairs_keep_order() {
        let flat = ChoiceSet::flat(["EUR", "USD"]);
        assert_eq!(
            options_for_select(&flat.options(), &["USD".to_string()]),
            "<option value=\"EUR\">EUR</option><option value=\"USD\" selected=\"selected\">USD</option>"
        );

        let pairs = ChoiceSet::pairs([("Zebra", "z"), ("Ape", "a")]);
        let labels: Vec<String> = pairs.options().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Zebra", "Ape"]);
    }

    #[test]
    fn test_map_and_records_sort_by_label() {
        let map = ChoiceSet::map([("Mail", "email"), ("Fax", "fax")]);
        assert_eq!(map.options()[0], SelectOption::new("Fax", "fax"));

        let acme = PlainRecord::new("Company").with("id", 2).with("name", "ACME");
        let abc = PlainRecord::new("Company").with("id", 9).with("name", "ABC");
        let records = ChoiceSet::records([&acme, &abc]);
        assert_eq!(
            records.options(),
            vec![SelectOption::new("ABC", "9"), SelectOption::new("ACME", "2")]
        );
    }

    #[test]
    fn test_normalizing_leaves_source_untouched() {
        let map = ChoiceSet::map([("b", "2"), ("a", "1")]);
        let before = map.clone();
        let _ = map.options();
        assert_eq!(map, before);
    }

    #[test]
    fn test_multiple_selected_values() {
        let set = ChoiceSet::flat(["a", "b", "c"]);
        let html = options_for_select(&set.options(), &["a".into(), "c".into()]);
        assert_eq!(html.matches("selected=\"selected\"").count(), 2);
    }

    #[test]
    fn test_grouped_options_skip_empty_groups() {
        let groups = vec![
            OptionGroup::new("User Templates", ChoiceSet::flat(Vec::<String>::new())),
            OptionGroup::new("Default Templates", ChoiceSet::pairs([("Invoice", "3")])),
        ];
        assert_eq!(
            grouped_options_for_select(&groups, &["3".into()]),
            "<optgroup label=\"Default Templates\"><option value=\"3\" selected=\"selected\">Invoice</option></optgroup>"
        );
    }

    #[test]
    fn test_option_labels_are_escaped() {
        let html = options_for_select(&[SelectOption::new("<none>", "")], &[]);
        assert_eq!(html, "<option value=\"\">&lt;none&gt;</option>");
    }
}
