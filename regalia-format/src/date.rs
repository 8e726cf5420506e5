//! Date rendering helpers
//!
//! Patterns use strftime syntax. Month and day names are taken from the
//! translation catalog (`date.month_names`, `date.abbr_day_names`, ...) when
//! present, so `%B` renders `März` under a German catalog.

use std::fmt::{self, Write};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use regalia_common::Translator;

/// Preset patterns offered in a date-format select box.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%m/%d/%Y"];

/// Fallback when the catalog has no `date.formats.default`.
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Fallback when the catalog has no `time.formats.default`.
pub const DEFAULT_TIME_PATTERN: &str = "%a, %d %b %Y %H:%M:%S %z";

/// `("{today in pattern} - {pattern}", pattern)` pairs for each preset.
pub fn date_format_options(today: NaiveDate) -> Vec<(String, String)> {
    DATE_FORMATS
        .iter()
        .filter_map(|pattern| {
            let example = render(today.format(pattern))?;
            Some((format!("{example} - {pattern}"), pattern.to_string()))
        })
        .collect()
}

/// Write a delayed chrono format into a string. Invalid patterns and
/// specifiers the value cannot satisfy (`%H` on a date) yield `None`.
pub fn render(formatted: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{formatted}").ok()?;
    Some(out)
}

/// Replace name specifiers with catalog translations. Unknown names are left
/// for chrono to render in English.
fn localize_names(pattern: &str, weekday: u32, month: u32, translator: &dyn Translator) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let Some(spec) = chars.next() else {
            out.push('%');
            break;
        };
        let key = match spec {
            'A' => Some(format!("date.day_names.{weekday}")),
            'a' => Some(format!("date.abbr_day_names.{weekday}")),
            'B' => Some(format!("date.month_names.{month}")),
            'b' => Some(format!("date.abbr_month_names.{month}")),
            _ => None,
        };
        match key.and_then(|k| translator.lookup(&k)) {
            Some(name) => out.push_str(&name.replace('%', "%%")),
            None => {
                out.push('%');
                out.push(spec);
            }
        }
    }
    out
}

/// Format a date with a strftime pattern and translated names.
pub fn localize_date(date: NaiveDate, pattern: &str, translator: &dyn Translator) -> Option<String> {
    let pattern = localize_names(
        pattern,
        date.weekday().num_days_from_sunday(),
        date.month(),
        translator,
    );
    render(date.format(&pattern))
}

/// Format a timestamp with a strftime pattern and translated names.
pub fn localize_datetime(
    datetime: DateTime<FixedOffset>,
    pattern: &str,
    translator: &dyn Translator,
) -> Option<String> {
    let pattern = localize_names(
        pattern,
        datetime.weekday().num_days_from_sunday(),
        datetime.month(),
        translator,
    );
    render(datetime.format(&pattern))
}
