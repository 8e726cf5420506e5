//! Process-wide formatting configuration
//!
//! Sources are merged in precedence order, later sources win:
//!
//! 1. Built-in defaults ([`FormatConfig::default`])
//! 2. `regalia.toml`, `regalia.yaml`, `regalia.yml`, `regalia.json` in the
//!    configuration directory (missing files are skipped)
//! 3. Environment variables prefixed `REGALIA_`, nested keys split on `__`
//!    (`REGALIA_DEFAULT_CURRENCY__UNIT`)
//!
//! The configuration is loaded once and then shared read-only.

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use regalia_common::{CurrencyFormat, Pretty};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::date::render;
use crate::error::{FormatError, FormatResult};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "REGALIA_";

/// Configuration file stem, looked up with every supported extension
pub const CONFIG_FILE_STEM: &str = "regalia";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Active locale of the translation service
    pub locale: String,
    /// Root of model attribute translations
    pub i18n_scope: String,
    /// Money format used when neither the call nor the record provides one.
    /// Always complete: a partial currency table fails to load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_currency: Option<CurrencyFormat>,
    /// strftime pattern used for date fields instead of the localized default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_date_format: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            i18n_scope: "activerecord".to_string(),
            default_currency: None,
            default_date_format: None,
        }
    }
}

impl FormatConfig {
    /// Build the figment with all sources in precedence order.
    pub fn figment(dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(FormatConfig::default()));
        for ext in ["toml", "yaml", "yml", "json"] {
            let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
            trace!("Merging configuration file {}", path.display());
            figment = match ext {
                "toml" => figment.merge(Toml::file(path)),
                "json" => figment.merge(Json::file(path)),
                _ => figment.merge(Yaml::file(path)),
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from `dir` and the environment.
    pub fn load(dir: &Path) -> FormatResult<Self> {
        Self::from_figment(Self::figment(dir))
    }

    /// Load configuration from defaults and the environment only.
    pub fn from_env() -> FormatResult<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(FormatConfig::default()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn from_figment(figment: Figment) -> FormatResult<Self> {
        let config: FormatConfig = figment.extract()?;
        config.validate()?;
        debug!("Loaded formatting configuration:\n{}", Pretty(&config));
        Ok(config)
    }

    /// Reject values that would only fail later, at render time.
    pub fn validate(&self) -> FormatResult<()> {
        if self.locale.trim().is_empty() {
            return Err(FormatError::InvalidValue {
                key: "locale".into(),
                message: "must not be empty".into(),
            });
        }
        if let Some(pattern) = &self.default_date_format {
            let probe = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
            if render(probe.format(pattern)).is_none() {
                return Err(FormatError::InvalidValue {
                    key: "default_date_format".into(),
                    message: format!("'{pattern}' is not a usable date pattern"),
                });
            }
        }
        Ok(())
    }

    pub fn with_default_currency(mut self, format: CurrencyFormat) -> Self {
        self.default_currency = Some(format);
        self
    }

    pub fn with_default_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.default_date_format = Some(pattern.into());
        self
    }
}
