//! Translation lookup
//!
//! Helpers only ever ask for keys and accept a miss. A [`Translator`] answers
//! single keys; [`Translator::translate`] walks a fallback chain of keys and
//! returns the first hit.
//!
//! [`Catalog`] is the bundled implementation. It reads the nested YAML layout
//! used by most web frameworks:
//!
//! ```yaml
//! en:
//!   activerecord:
//!     attributes:
//!       client:
//!         first_name: First name
//! ```
//!
//! and flattens it into dotted keys (`activerecord.attributes.client.first_name`).
//! Sequences are flattened by index (`date.month_names.1`).

use std::collections::HashMap;
use std::path::Path;

use serde_yaml_ng::Value as YamlValue;
use tracing::{debug, trace};

use crate::error::{RegaliaError, Result};

/// Key/value translation service consumed by the helpers.
pub trait Translator: Send + Sync {
    /// Active locale, e.g. `"de"`.
    fn locale(&self) -> &str;

    /// Look up one key. Missing keys return `None`, never an error.
    fn lookup(&self, key: &str) -> Option<String>;

    /// First hit of a chain of keys.
    fn translate(&self, keys: &[String]) -> Option<String> {
        let hit = keys.iter().find_map(|key| self.lookup(key));
        if hit.is_none() {
            trace!(keys = ?keys, locale = self.locale(), "translation missing");
        }
        hit
    }

    /// Look up a key or fall back to a literal default.
    fn translate_or(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }
}

/// Turn an attribute name into a readable caption: `first_name` → `First name`,
/// `client_id` → `Client`.
pub fn humanize(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field);
    let spaced = base.replace('_', " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// In-memory translation catalog with locale fallback.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: String,
    default_locale: String,
    entries: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Create an empty catalog whose active and default locale is `locale`.
    pub fn new(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        Self {
            default_locale: locale.clone(),
            locale,
            entries: HashMap::new(),
        }
    }

    /// Switch the active locale. The default locale stays the last fallback.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Add a single translation.
    pub fn insert(&mut self, locale: &str, key: &str, value: impl Into<String>) -> &mut Self {
        self.entries
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        self
    }

    /// Builder-style variant of [`Catalog::insert`] for the active locale.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        let locale = self.locale.clone();
        self.insert(&locale, key, value);
        self
    }

    /// Merge a YAML document whose top-level keys are locales.
    pub fn load_yaml_str(&mut self, yaml: &str) -> Result<usize> {
        let document: YamlValue = serde_yaml_ng::from_str(yaml)?;
        let YamlValue::Mapping(locales) = document else {
            return Err(RegaliaError::Translation {
                message: "top level of a translation file must map locales to keys".into(),
            });
        };

        let mut loaded = 0;
        for (locale, tree) in locales {
            let Some(locale) = scalar_to_string(&locale) else {
                return Err(RegaliaError::Translation {
                    message: format!("invalid locale key: {locale:?}"),
                });
            };
            let mut flat = Vec::new();
            flatten(String::new(), &tree, &mut flat);
            loaded += flat.len();
            let table = self.entries.entry(locale).or_default();
            table.extend(flat);
        }

        debug!(keys = loaded, "loaded translations");
        Ok(loaded)
    }

    /// Merge a YAML translation file from disk.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let content = std::fs::read_to_string(path.as_ref())?;
        self.load_yaml_str(&content)
    }

    /// Locales consulted for a lookup, most specific first:
    /// `de-CH` → `de` → default locale.
    pub fn locale_chain(&self) -> Vec<String> {
        let mut chain = vec![self.locale.clone()];
        let mut current = self.locale.as_str();
        while let Some(pos) = current.rfind(['-', '_']) {
            current = &current[..pos];
            chain.push(current.to_string());
        }
        if !chain.contains(&self.default_locale) {
            chain.push(self.default_locale.clone());
        }
        chain
    }
}

impl Translator for Catalog {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.locale_chain()
            .iter()
            .filter_map(|locale| self.entries.get(locale))
            .find_map(|table| table.get(key).cloned())
    }
}

fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn flatten(prefix: String, value: &YamlValue, out: &mut Vec<(String, String)>) {
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}.{segment}")
        }
    };
    match value {
        YamlValue::Mapping(map) => {
            for (key, child) in map {
                if let Some(segment) = scalar_to_string(key) {
                    flatten(join(&segment), child, out);
                }
            }
        }
        YamlValue::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(join(&index.to_string()), child, out);
            }
        }
        YamlValue::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        YamlValue::Null => {}
        scalar => {
            if let Some(text) = scalar_to_string(scalar) {
                out.push((prefix, text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const YAML: &str = r#"
en:
  activerecord:
    attributes:
      client:
        first_name: First name
  sk:
    "yes": "Yes"
  date:
    month_names: [~, January, February]
de:
  activerecord:
    attributes:
      client:
        first_name: Vorname
"#;

    #[rstest]
    #[case("first_name", "First name")]
    #[case("client_id", "Client")]
    #[case("notes", "Notes")]
    #[case("", "")]
    fn test_humanize(#[case] field: &str, #[case] expected: &str) {
        assert_eq!(humanize(field), expected);
    }

    #[test]
    fn test_load_and_lookup() {
        let mut catalog = Catalog::new("en");
        let loaded = catalog.load_yaml_str(YAML).unwrap();
        assert_eq!(loaded, 5);
        assert_eq!(
            catalog.lookup("activerecord.attributes.client.first_name"),
            Some("First name".into())
        );
        assert_eq!(catalog.lookup("sk.yes"), Some("Yes".into()));
        assert_eq!(catalog.lookup("date.month_names.2"), Some("February".into()));
        assert_eq!(catalog.lookup("date.month_names.0"), None);
    }

    #[test]
    fn test_locale_fallback_chain() {
        let mut catalog = Catalog::new("en").with_locale("de-CH");
        catalog.load_yaml_str(YAML).unwrap();
        assert_eq!(catalog.locale_chain(), vec!["de-CH", "de", "en"]);
        assert_eq!(
            catalog.lookup("activerecord.attributes.client.first_name"),
            Some("Vorname".into())
        );
        // Only present in the default locale
        assert_eq!(catalog.lookup("sk.yes"), Some("Yes".into()));
    }

    #[test]
    fn test_translate_takes_first_hit() {
        let catalog = Catalog::new("en").with("b", "second").with("c", "third");
        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(catalog.translate(&keys), Some("second".into()));
        assert_eq!(catalog.translate(&["x".to_string()]), None);
        assert_eq!(catalog.translate_or("x", "fallback"), "fallback");
    }

    #[test]
    fn test_rejects_non_mapping_document() {
        let mut catalog = Catalog::new("en");
        let err = catalog.load_yaml_str("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, RegaliaError::Translation { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.yml");
        std::fs::write(&path, "en:\n  link:\n    edit: Edit\n").unwrap();

        let mut catalog = Catalog::new("en");
        assert_eq!(catalog.load_file(&path).unwrap(), 1);
        assert_eq!(catalog.lookup("link.edit"), Some("Edit".into()));
    }
}
