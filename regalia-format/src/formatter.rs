//! Value formatter
//!
//! [`ValueFormatter::strfval`] turns an attribute value into display text. The
//! value's kind comes from its [`Value`] variant or from the field kinds
//! declared in the [`FieldKindRegistry`]; the first matching rule wins:
//!
//! 1. no explicit value and no such attribute → `None`
//! 2. enum symbol → translated enum value
//! 3. timestamp → localized timestamp
//! 4. boolean → translated yes/no
//! 5. percent field → percentage with auto precision
//! 6. money field or explicit currency → currency
//! 7. date value, date field or explicit date option → localized date, blank
//!    values are returned unchanged
//! 8. anything else → the raw text, escaped when HTML output is requested

use std::sync::Arc;

use regalia_common::{
    html, humanize, Catalog, CurrencyFormat, RegaliaError, Record, Result, Translator, Value,
};
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::config::FormatConfig;
use crate::date::{self, DEFAULT_DATE_PATTERN, DEFAULT_TIME_PATTERN};
use crate::money::money_symbols;
use crate::number;
use crate::registry::{FieldKind, FieldKindRegistry};

/// How a date field should be rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// Configured default pattern, else the localized default
    #[default]
    Default,
    /// Explicit strftime pattern
    Pattern(String),
}

/// Per-call formatting options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatOptions {
    /// Render as money with these settings
    pub currency: Option<CurrencyFormat>,
    /// Render as date
    pub date: Option<DateFormat>,
    /// Escape the plain-text result for HTML output
    pub html: bool,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(mut self, format: CurrencyFormat) -> Self {
        self.currency = Some(format);
        self
    }

    pub fn date(mut self, format: DateFormat) -> Self {
        self.date = Some(format);
        self
    }

    pub fn date_pattern(self, pattern: impl Into<String>) -> Self {
        self.date(DateFormat::Pattern(pattern.into()))
    }

    pub fn html(mut self) -> Self {
        self.html = true;
        self
    }

    /// Read options from a loosely typed JSON map as passed by templates:
    ///
    /// ```json
    /// { "currency": "EUR", "date": "%d.%m.%Y", "format": "html" }
    /// ```
    ///
    /// `currency` is an ISO code with a preset or a complete currency table;
    /// `date` is `true` or a pattern. Other keys are ignored.
    pub fn from_json(options: &JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = options else {
            return Err(RegaliaError::argument(
                "format options",
                format!("expected a map, got {options}"),
            ));
        };

        let mut parsed = FormatOptions::default();
        if let Some(currency) = map.get("currency") {
            parsed.currency = match currency {
                JsonValue::Null => None,
                JsonValue::String(code) => Some(
                    money_symbols()
                        .get(code.as_str())
                        .cloned()
                        .flatten()
                        .ok_or_else(|| {
                            RegaliaError::argument(
                                "format options",
                                format!("no currency preset for {code}"),
                            )
                        })?,
                ),
                JsonValue::Object(_) => Some(
                    serde_json::from_value(currency.clone()).map_err(|e| {
                        RegaliaError::argument("format options", format!("currency: {e}"))
                    })?,
                ),
                other => {
                    return Err(RegaliaError::argument(
                        "format options",
                        format!("unsupported currency option {other}"),
                    ))
                }
            };
        }
        if let Some(date) = map.get("date") {
            parsed.date = match date {
                JsonValue::Null | JsonValue::Bool(false) => None,
                JsonValue::Bool(true) => Some(DateFormat::Default),
                JsonValue::String(pattern) => Some(DateFormat::Pattern(pattern.clone())),
                other => {
                    return Err(RegaliaError::argument(
                        "format options",
                        format!("unsupported date option {other}"),
                    ))
                }
            };
        }
        parsed.html = matches!(map.get("format"), Some(JsonValue::String(f)) if f == "html");
        Ok(parsed)
    }
}

/// Locale-aware value formatter.
///
/// Holds the shared registry, the translation service and the process-wide
/// configuration. Cloning is cheap.
#[derive(Clone)]
pub struct ValueFormatter {
    registry: Arc<FieldKindRegistry>,
    translator: Arc<dyn Translator>,
    config: Arc<FormatConfig>,
}

impl std::fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueFormatter")
            .field("models", &self.registry.len())
            .field("locale", &self.translator.locale())
            .field("config", &self.config)
            .finish()
    }
}

impl ValueFormatter {
    pub fn new(
        registry: Arc<FieldKindRegistry>,
        translator: Arc<dyn Translator>,
        config: FormatConfig,
    ) -> Self {
        Self {
            registry,
            translator,
            config: Arc::new(config),
        }
    }

    /// A formatter over `catalog`, switched to the configured locale. The
    /// catalog's own default locale stays the last fallback.
    pub fn with_catalog(
        registry: Arc<FieldKindRegistry>,
        mut catalog: Catalog,
        config: FormatConfig,
    ) -> Self {
        catalog.set_locale(config.locale.clone());
        debug!(locale = %config.locale, "formatter locale");
        Self::new(registry, Arc::new(catalog), config)
    }

    pub fn registry(&self) -> &FieldKindRegistry {
        &self.registry
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Look up a single key, e.g. `link.edit`.
    pub fn t(&self, key: &str) -> Option<String> {
        self.translator.lookup(key)
    }

    /// Display text for `field`.
    ///
    /// `value` overrides the attribute read from `object`. A present but null
    /// attribute formats as an empty string; an absent one yields `None`.
    pub fn strfval(
        &self,
        object: Option<&dyn Record>,
        field: &str,
        value: Option<&Value>,
        opts: &FormatOptions,
    ) -> Option<String> {
        let value = match value.filter(|v| !matches!(v, Value::Null)) {
            Some(v) => v.clone(),
            None => match object?.attribute(field)? {
                Value::Null => Value::Text(String::new()),
                v => v,
            },
        };
        let model = object.map(|o| o.model_name());
        let is_kind = |kind| model.is_some_and(|m| self.registry.is_kind(m, kind, field));
        // text taken from the value itself, escaped for html output
        let plain = |text: String| if opts.html { html::escape(&text) } else { text };

        match &value {
            Value::Enum(symbol) => {
                return match model {
                    Some(model) => self.translated_enum_value(model, field, symbol).map(plain),
                    None if symbol.trim().is_empty() => None,
                    None => Some(plain(humanize(symbol))),
                }
            }
            Value::DateTime(dt) => return Some(self.localize_datetime(*dt)),
            Value::Bool(b) => return Some(self.yes_no(*b)),
            _ => {}
        }

        if is_kind(FieldKind::Percent) {
            if value.is_blank() {
                return Some(String::new());
            }
            return Some(
                self.number_to_percentage_auto_precision(&value)
                    .unwrap_or_else(|| plain(value.to_param())),
            );
        }

        if is_kind(FieldKind::Money) || opts.currency.is_some() {
            if !value.is_blank() && value.as_decimal().is_none() {
                return Some(plain(value.to_param()));
            }
            let settings = opts
                .currency
                .clone()
                .or_else(|| object.and_then(|o| o.currency_format(field)));
            return Some(self.strfmoney(&value, settings.as_ref()));
        }

        if matches!(value, Value::Date(_)) || is_kind(FieldKind::Date) || opts.date.is_some() {
            if value.is_blank() {
                return Some(plain(value.to_param()));
            }
            let Some(date) = value.as_date() else {
                return Some(plain(value.to_param()));
            };
            let formatted = match &opts.date {
                Some(DateFormat::Pattern(pattern)) => {
                    date::localize_date(date, pattern, self.translator())
                }
                _ => match &self.config.default_date_format {
                    Some(pattern) => date::localize_date(date, pattern, self.translator()),
                    None => Some(self.localize_date(date)),
                },
            };
            return Some(formatted.unwrap_or_else(|| plain(value.to_param())));
        }

        Some(plain(value.to_param()))
    }

    /// Format a money amount. Settings fall back to the configured default
    /// currency, then to the locale's currency format.
    pub fn strfmoney(&self, value: &Value, format: Option<&CurrencyFormat>) -> String {
        if value.is_blank() {
            return String::new();
        }
        let Some(amount) = value.as_decimal() else {
            trace!(value = %value, "money value is not numeric");
            return value.to_param();
        };
        match format {
            Some(format) => number::to_currency(amount, format),
            None => number::to_currency(amount, &self.default_currency_format()),
        }
    }

    /// Currency format used when nothing more specific is given.
    pub fn default_currency_format(&self) -> CurrencyFormat {
        if let Some(format) = &self.config.default_currency {
            return format.clone();
        }
        let fallback = CurrencyFormat::default();
        let lookup = |key: &str, default: String| {
            self.t(&format!("number.currency.format.{key}"))
                .unwrap_or(default)
        };
        CurrencyFormat {
            unit: lookup("unit", fallback.unit),
            format: lookup("format", fallback.format),
            precision: self
                .t("number.currency.format.precision")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(fallback.precision),
            delimiter: lookup("delimiter", fallback.delimiter),
            separator: lookup("separator", fallback.separator),
        }
    }

    /// `19` → `19%`, `7.5` → `7,5%` under a `,` decimal separator.
    pub fn number_to_percentage_auto_precision(&self, value: &Value) -> Option<String> {
        let number = value.as_decimal()?;
        let separator = self
            .t("number.format.separator")
            .unwrap_or_else(|| ".".to_string());
        Some(number::to_percentage_auto_precision(number, &separator))
    }

    /// Translation of an enum symbol, looked up for the model and each of its
    /// ancestors under `{scope}.attributes.{model}.enum.{field}.{value}`.
    /// Blank symbols yield `None`; untranslated ones are humanized.
    pub fn translated_enum_value(&self, model: &str, field: &str, value: &str) -> Option<String> {
        if value.trim().is_empty() {
            return None;
        }
        let scope = &self.config.i18n_scope;
        let keys: Vec<String> = self
            .registry
            .i18n_keys(model)
            .iter()
            .map(|key| format!("{scope}.attributes.{key}.enum.{field}.{value}"))
            .collect();
        Some(
            self.translator
                .translate(&keys)
                .unwrap_or_else(|| humanize(value)),
        )
    }

    /// Caption of an attribute: the translation found for the model or the
    /// nearest ancestor, then the global `attributes.{field}`, then the
    /// humanized field name.
    pub fn human_attribute_name(&self, model: &str, field: &str) -> String {
        let scope = &self.config.i18n_scope;
        let mut keys: Vec<String> = self
            .registry
            .i18n_keys(model)
            .iter()
            .map(|key| format!("{scope}.attributes.{key}.{field}"))
            .collect();
        keys.push(format!("attributes.{field}"));
        self.translator
            .translate(&keys)
            .unwrap_or_else(|| humanize(field))
    }

    /// Translated model name, `{scope}.models.{model}`.
    pub fn human_model_name(&self, model: &str) -> String {
        let scope = &self.config.i18n_scope;
        let keys: Vec<String> = self
            .registry
            .i18n_keys(model)
            .iter()
            .map(|key| format!("{scope}.models.{key}"))
            .collect();
        self.translator
            .translate(&keys)
            .unwrap_or_else(|| humanize(&self.registry.i18n_keys(model)[0]))
    }

    pub fn yes_no(&self, value: bool) -> String {
        if value {
            self.translator.translate_or("sk.yes", "Yes")
        } else {
            self.translator.translate_or("sk.no", "No")
        }
    }

    /// Date in the locale's `date.formats.default` pattern.
    pub fn localize_date(&self, value: chrono::NaiveDate) -> String {
        let pattern = self
            .t("date.formats.default")
            .unwrap_or_else(|| DEFAULT_DATE_PATTERN.to_string());
        date::localize_date(value, &pattern, self.translator())
            .or_else(|| date::localize_date(value, DEFAULT_DATE_PATTERN, self.translator()))
            .unwrap_or_default()
    }

    /// Timestamp in the locale's `time.formats.default` pattern.
    pub fn localize_datetime(&self, value: chrono::DateTime<chrono::FixedOffset>) -> String {
        let pattern = self
            .t("time.formats.default")
            .unwrap_or_else(|| DEFAULT_TIME_PATTERN.to_string());
        date::localize_datetime(value, &pattern, self.translator())
            .or_else(|| date::localize_datetime(value, DEFAULT_TIME_PATTERN, self.translator()))
            .unwrap_or_default()
    }
}
