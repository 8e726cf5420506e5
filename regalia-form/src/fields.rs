//! Field methods of the form builder
//!
//! Every field resolves its title and value, renders the raw input plus an
//! info annotation and hands the result to the wrapper. `hidden` and `submit`
//! are the exceptions: they are never wrapped.

use chrono::{Datelike, Local, Month, Timelike};
use regalia_common::html::{content_tag, escape, tag};
use regalia_common::{Attributes, ClassList, RegaliaError, Result, Value};
use regalia_format::FormatOptions;

use crate::builder::{sanitize_id, FormBuilder, MetadataKind};
use crate::choices::{blank_option, grouped_options_for_select, options_for_select, ChoiceSet, OptionGroup};
use crate::options::{FieldName, FieldOptions, Info};
use crate::wrapper::InputKind;

/// Widest text input, in characters.
const MAX_TEXT_SIZE: u32 = 25;

/// Years offered around the selected year.
const YEAR_SPAN: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn parse(value: &str) -> Option<Self> {
        match value.trim_start_matches(':') {
            "year" => Some(DatePart::Year),
            "month" => Some(DatePart::Month),
            "day" => Some(DatePart::Day),
            _ => None,
        }
    }

    /// Position in the multi-parameter name, `(1i)` for the year.
    fn index(&self) -> u8 {
        match self {
            DatePart::Year => 1,
            DatePart::Month => 2,
            DatePart::Day => 3,
        }
    }
}

impl<'a> FormBuilder<'a> {
    /// Common attributes of an input: type, id and name.
    fn input_attrs(&self, name: &FieldName, input_type: &str) -> Attributes {
        let mut attrs = Attributes::new().with("type", input_type);
        if let Some(id) = self.input_id(name) {
            attrs.insert("id", id);
        }
        attrs.insert("name", self.input_name(name));
        attrs
    }

    /// Text input. Attribute fields with a column limit get `maxlength` set
    /// to the limit and `size` to the limit capped at 25.
    pub fn text(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);

        let mut attrs = self.input_attrs(&name, "text");
        attrs.insert("value", field.value.to_param());
        attrs.merge(&opts.attrs);
        attrs.add_class("text");
        if name.is_attribute() && self.object().is_some() {
            let limit = self
                .formatter()
                .registry()
                .column(self.model_name(), name.as_str())
                .and_then(|column| column.limit);
            if let Some(limit) = limit {
                attrs.insert_default("maxlength", limit.to_string());
                attrs.insert_default("size", limit.min(MAX_TEXT_SIZE).to_string());
            }
        }

        let tags = tag("input", &attrs) + &self.info_tag(&opts.info, &name);
        Ok(self.tag_wrapper(&field.title, &tags, InputKind::Text, &opts.wrap))
    }

    /// Password input. The stored value is never echoed, only an explicit one.
    pub fn password(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);

        let mut attrs = self.input_attrs(&name, "password");
        if let Some(value) = &opts.value {
            attrs.insert("value", value.to_param());
        }
        attrs.merge(&opts.attrs);
        attrs.add_class("text");

        let tags = tag("input", &attrs) + &self.info_tag(&opts.info, &name);
        Ok(self.tag_wrapper(&field.title, &tags, InputKind::Password, &opts.wrap))
    }

    /// Multi-line text, 20 columns by 3 rows unless given otherwise.
    pub fn memo(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);

        let mut attrs = Attributes::new();
        if let Some(id) = self.input_id(&name) {
            attrs.insert("id", id);
        }
        attrs.insert("name", self.input_name(&name));
        attrs.merge(&opts.attrs);
        attrs.insert_default("cols", "20");
        attrs.insert_default("rows", "3");

        let tags = content_tag("textarea", &escape(&field.value.to_param()), &attrs)
            + &self.info_tag(&opts.info, &name);
        Ok(self.tag_wrapper(&field.title, &tags, InputKind::Textarea, &opts.wrap))
    }

    /// Hidden input, never wrapped and never counted in bundles.
    pub fn hidden(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let value = opts
            .value
            .clone()
            .unwrap_or_else(|| self.current_value(name.as_str()));

        let mut attrs = self.input_attrs(&name, "hidden");
        attrs.insert("value", value.to_param());
        attrs.merge(&opts.attrs);
        Ok(tag("input", &attrs))
    }

    /// File upload input.
    pub fn file(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);

        let mut attrs = self.input_attrs(&name, "file");
        attrs.merge(&opts.attrs);

        let tags = tag("input", &attrs) + &self.info_tag(&opts.info, &name);
        Ok(self.tag_wrapper(&field.title, &tags, InputKind::File, &opts.wrap))
    }

    /// Checkbox submitting `1`, or the explicit value.
    ///
    /// Attribute checkboxes are preceded by a hidden `0` input so unchecking
    /// is submitted too, and are checked when the attribute is truthy.
    pub fn checkbox(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let title = opts.title.clone().unwrap_or_else(|| self.build_title(&name));
        let submitted = opts
            .value
            .as_ref()
            .map(Value::to_param)
            .unwrap_or_else(|| "1".to_string());
        let checked = opts.checked.unwrap_or_else(|| {
            name.is_attribute() && self.current_value(name.as_str()).is_truthy()
        });

        let mut tags = String::new();
        if name.is_attribute() {
            let unchecked = Attributes::new()
                .with("type", "hidden")
                .with("name", self.input_name(&name))
                .with("value", "0");
            tags.push_str(&tag("input", &unchecked));
        }
        let mut attrs = self.input_attrs(&name, "checkbox");
        attrs.insert("value", submitted);
        if checked {
            attrs.insert("checked", "checked");
        }
        attrs.merge(&opts.attrs);
        tags.push_str(&tag("input", &attrs));
        tags.push_str(&self.info_tag(&opts.info, &name));

        Ok(self.tag_wrapper(&title, &tags, InputKind::Checkbox, &opts.wrap))
    }

    /// Radio button submitting `tag_value`, checked when the field holds it.
    pub fn radio(
        &mut self,
        name: impl Into<FieldName>,
        tag_value: &str,
        opts: FieldOptions,
    ) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);

        let mut attrs = Attributes::new().with("type", "radio");
        if let Some(id) = self.input_id(&name) {
            attrs.insert("id", format!("{id}_{}", sanitize_id(tag_value)));
        }
        attrs.insert("name", self.input_name(&name));
        attrs.insert("value", tag_value);
        if field.value.to_params().iter().any(|v| v == tag_value) {
            attrs.insert("checked", "checked");
        }
        attrs.merge(&opts.attrs);

        let tags = tag("input", &attrs) + &self.info_tag(&opts.info, &name);
        Ok(self.tag_wrapper(&field.title, &tags, InputKind::Radio, &opts.wrap))
    }

    /// Choices of a selection: explicit ones, else the enumerated values
    /// declared for the attribute (translated, sorted by label), else none.
    fn resolve_choices(&self, name: &FieldName, opts: &FieldOptions) -> ChoiceSet {
        if let Some(choices) = &opts.choices {
            return choices.clone();
        }
        let FieldName::Attribute(field) = name else {
            return ChoiceSet::Flat(Vec::new());
        };
        let model = self.model_name();
        match self.formatter().registry().enum_values(model, field) {
            Some(values) => ChoiceSet::map(values.iter().map(|value| {
                let label = self
                    .formatter()
                    .translated_enum_value(model, field, value)
                    .unwrap_or_else(|| value.clone());
                (label, value.clone())
            })),
            None => ChoiceSet::Flat(Vec::new()),
        }
    }

    fn select_attrs(&self, name: &FieldName, opts: &FieldOptions) -> Attributes {
        let mut attrs = Attributes::new();
        if let Some(id) = self.input_id(name) {
            attrs.insert("id", id);
        }
        let mut input_name = self.input_name(name);
        if opts.attrs.contains("multiple") && !input_name.ends_with("[]") {
            input_name.push_str("[]");
        }
        attrs.insert("name", input_name);
        attrs.merge(&opts.attrs);
        attrs
    }

    /// Select box.
    ///
    /// The selected values come from `selected`, else from the field value; a
    /// list value selects several options. A blank leading option is added
    /// unless `include_blank` is off. Without any choices the select is
    /// rendered empty.
    pub fn selection(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);
        let choices = self.resolve_choices(&name, &opts);
        let selected = opts.selected.as_ref().unwrap_or(&field.value).to_params();

        let mut option_tags = String::new();
        if opts.include_blank.unwrap_or(true) {
            option_tags.push_str(&blank_option());
        }
        option_tags.push_str(&options_for_select(&choices.options(), &selected));

        let attrs = self.select_attrs(&name, &opts);
        let tags = content_tag("select", &option_tags, &attrs) + &self.info_tag(&opts.info, &name);
        Ok(self.tag_wrapper(&field.title, &tags, InputKind::Select, &opts.wrap))
    }

    /// Select box with one `optgroup` per non-empty group, in the given order.
    pub fn selection_group(
        &mut self,
        name: impl Into<FieldName>,
        groups: &[OptionGroup],
        opts: FieldOptions,
    ) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);
        let selected = opts.selected.as_ref().unwrap_or(&field.value).to_params();

        let attrs = self.select_attrs(&name, &opts);
        let tags = content_tag("select", &grouped_options_for_select(groups, &selected), &attrs)
            + &self.info_tag(&opts.info, &name);
        Ok(self.tag_wrapper(&field.title, &tags, InputKind::Select, &opts.wrap))
    }

    /// Year, month and day selects.
    pub fn date(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        self.date_field(name.into(), opts, false)
    }

    /// Date selects followed by hour and minute selects.
    pub fn datetime(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        self.date_field(name.into(), opts, true)
    }

    fn date_field(&mut self, name: FieldName, opts: FieldOptions, with_time: bool) -> Result<String> {
        let field = self.describe(&name, &opts);
        let include_blank = opts.include_blank.unwrap_or(true);

        // classes style the wrapper, the selects get the remaining attributes
        let classes = opts.attrs.classes().clone();
        let mut select_attrs = opts.attrs.clone();
        *select_attrs.classes_mut() = ClassList::new();

        let mut selects = self.date_selects(&name, &field.value, include_blank, &select_attrs);
        if with_time {
            selects.push_str(" &mdash; ");
            selects.push_str(&self.time_selects(&name, &field.value, include_blank, &select_attrs));
        }
        selects.push_str(&self.info_tag(&opts.info, &name));

        let mut wrap = opts.wrap.clone();
        wrap.dt.classes_mut().extend(&classes);
        wrap.dd.classes_mut().extend(&classes);
        wrap.dd.add_class("dates");
        wrap.div.add_class("dates");
        Ok(self.tag_wrapper(&field.title, &selects, InputKind::Date, &wrap))
    }

    /// Name and id of one part of a multi-parameter date input.
    fn part_name(&self, name: &FieldName, index: u8) -> (String, Option<String>) {
        let input_name = match name {
            FieldName::Attribute(field) => {
                format!("{}[{}({}i)]", self.object_name(), field, index)
            }
            FieldName::Raw(raw) => match raw.strip_suffix(']') {
                Some(base) => format!("{base}({index}i)]"),
                None => format!("{raw}({index}i)"),
            },
        };
        let id = self.input_id(name).map(|id| format!("{id}_{index}i"));
        (input_name, id)
    }

    fn part_select(
        &self,
        name: &FieldName,
        index: u8,
        options: Vec<(String, String)>,
        selected: Option<String>,
        include_blank: bool,
        attrs: &Attributes,
    ) -> String {
        let (input_name, id) = self.part_name(name, index);
        let mut select = Attributes::new();
        if let Some(id) = id {
            select.insert("id", id);
        }
        select.insert("name", input_name);
        select.merge(attrs);

        let mut option_tags = String::new();
        if include_blank {
            option_tags.push_str(&blank_option());
        }
        let choices = ChoiceSet::Pairs(options);
        let selected: Vec<String> = selected.into_iter().collect();
        option_tags.push_str(&options_for_select(&choices.options(), &selected));
        content_tag("select", &option_tags, &select)
    }

    /// Order of the date selects, `date.order` of the locale or year, month, day.
    fn date_order(&self) -> Vec<DatePart> {
        let order: Vec<DatePart> = (0..3)
            .filter_map(|i| self.formatter().t(&format!("date.order.{i}")))
            .filter_map(|part| DatePart::parse(&part))
            .collect();
        if order.len() == 3 {
            order
        } else {
            vec![DatePart::Year, DatePart::Month, DatePart::Day]
        }
    }

    fn month_name(&self, month: u32) -> String {
        self.formatter()
            .t(&format!("date.month_names.{month}"))
            .or_else(|| {
                u8::try_from(month)
                    .ok()
                    .and_then(|m| Month::try_from(m).ok())
                    .map(|m| m.name().to_string())
            })
            .unwrap_or_else(|| month.to_string())
    }

    fn date_selects(
        &self,
        name: &FieldName,
        value: &Value,
        include_blank: bool,
        attrs: &Attributes,
    ) -> String {
        let date = value.as_date();
        let center = date.map(|d| d.year()).unwrap_or_else(|| Local::now().year());

        self.date_order()
            .into_iter()
            .map(|part| {
                let (options, selected) = match part {
                    DatePart::Year => (
                        ((center - YEAR_SPAN)..=(center + YEAR_SPAN))
                            .map(|y| (y.to_string(), y.to_string()))
                            .collect(),
                        date.map(|d| d.year().to_string()),
                    ),
                    DatePart::Month => (
                        (1..=12)
                            .map(|m| (self.month_name(m), m.to_string()))
                            .collect(),
                        date.map(|d| d.month().to_string()),
                    ),
                    DatePart::Day => (
                        (1..=31).map(|d| (d.to_string(), d.to_string())).collect(),
                        date.map(|d| d.day().to_string()),
                    ),
                };
                self.part_select(name, part.index(), options, selected, include_blank, attrs)
            })
            .collect()
    }

    fn time_selects(
        &self,
        name: &FieldName,
        value: &Value,
        include_blank: bool,
        attrs: &Attributes,
    ) -> String {
        let time = match value {
            Value::DateTime(dt) => Some((dt.hour(), dt.minute())),
            _ => None,
        };
        let two_digits = |range: std::ops::RangeInclusive<u32>| -> Vec<(String, String)> {
            range
                .map(|n| (format!("{n:02}"), format!("{n:02}")))
                .collect()
        };
        let hours = self.part_select(
            name,
            4,
            two_digits(0..=23),
            time.map(|(h, _)| format!("{h:02}")),
            include_blank,
            attrs,
        );
        let minutes = self.part_select(
            name,
            5,
            two_digits(0..=59),
            time.map(|(_, m)| format!("{m:02}")),
            include_blank,
            attrs,
        );
        format!("{hours} : {minutes}")
    }

    /// A field value shown as formatted text instead of an input.
    ///
    /// Money fields get a `right` class on the value element. Info is only
    /// shown when given explicitly.
    pub fn static_text(&mut self, name: impl Into<FieldName>, opts: FieldOptions) -> Result<String> {
        let name = name.into();
        let field = self.describe(&name, &opts);

        let mut value = match &opts.value {
            Some(value) => escape(&value.to_param()),
            None => {
                let format = FormatOptions {
                    html: true,
                    ..opts.format.clone()
                };
                self.formatter()
                    .strfval(self.object(), name.as_str(), None, &format)
                    .unwrap_or_default()
            }
        };
        if !matches!(opts.info, Info::Auto) {
            value.push_str(&self.info_tag(&opts.info, &name));
        }

        let mut wrap = opts.wrap.clone();
        if name.is_attribute() && field.kind == MetadataKind::Money {
            wrap.add_value_class("right");
        }
        Ok(self.tag_wrapper(&field.title, &value, InputKind::Static, &wrap))
    }

    /// Static text without a field: both `title` and `value` are required.
    pub fn static_text_short(&mut self, opts: FieldOptions) -> Result<String> {
        let (Some(title), Some(value)) = (&opts.title, &opts.value) else {
            return Err(RegaliaError::argument(
                "static_text",
                "title and value are required when no field is given",
            ));
        };
        let mut html = escape(&value.to_param());
        if !matches!(opts.info, Info::Auto) {
            html.push_str(&self.info_tag(&opts.info, &FieldName::raw("")));
        }
        let title = title.clone();
        Ok(self.tag_wrapper(&title, &html, InputKind::Static, &opts.wrap))
    }

    /// Submit button inside `span.submit`, or bare with `nowrap`.
    pub fn submit(&mut self, caption: &str, opts: FieldOptions) -> Result<String> {
        let mut attrs = Attributes::new()
            .with("type", "submit")
            .with("name", "commit")
            .with("value", caption);
        attrs.merge(&opts.attrs);
        let button = tag("input", &attrs);
        if opts.nowrap {
            Ok(button)
        } else {
            Ok(content_tag(
                "span",
                &button,
                &Attributes::new().with_class("submit"),
            ))
        }
    }
}
