//! Logging utilities
//!
//! Helpers log through `tracing`; this module only adds a display wrapper for
//! structured values.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as YAML
///
/// ```ignore
/// use regalia_common::Pretty;
/// use tracing::debug;
///
/// debug!("formatting configuration: {}", Pretty(&config));
/// ```
///
/// Outputs YAML with a leading newline. Debug is used as a fallback if YAML
/// serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurrencyFormat;

    #[test]
    fn test_pretty_renders_yaml() {
        let rendered = Pretty(&CurrencyFormat::default()).to_string();
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("unit:"));
        assert!(rendered.contains("precision: 2"));
    }
}
