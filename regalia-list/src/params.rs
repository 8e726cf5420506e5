//! Query parameters of the current request
//!
//! Sort links keep every visible parameter of the page and only change the
//! sort keys, so a filter set before sorting survives the click.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Nested request parameters, `filter[letter]=T` is `{"filter": {"letter": "T"}}`.
pub type Params = Map<String, JsonValue>;

/// Routing keys that are part of the path, not of the query.
const HIDDEN_KEYS: [&str; 2] = ["action", "controller"];

/// Path, parameters and authenticity token of the request being rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestParams {
    pub path: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub token: Option<String>,
}

impl RequestParams {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// A top-level parameter as text.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(JsonValue::as_str)
    }

    /// All parameters except the routing keys `action` and `controller`.
    pub fn visible_params(&self) -> Params {
        self.params
            .iter()
            .filter(|(key, _)| !HIDDEN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// The visible parameters with `changes` deep merged into them. Nested
    /// keys that `changes` does not mention are kept.
    pub fn change_params(&self, changes: &Params) -> Params {
        let mut params = self.visible_params();
        deep_merge(&mut params, changes);
        params
    }

    /// URL of the current path with the given parameters.
    pub fn url_for(&self, params: &Params) -> String {
        let query = to_query(params);
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    /// URL of the current page with some parameters changed.
    pub fn change_params_url(&self, changes: &Params) -> String {
        self.url_for(&self.change_params(changes))
    }
}

/// Merge `changes` into `base`, descending into maps present on both sides.
pub fn deep_merge(base: &mut Params, changes: &Params) {
    for (key, change) in changes {
        match (base.get_mut(key), change) {
            (Some(JsonValue::Object(existing)), JsonValue::Object(nested)) => {
                deep_merge(existing, nested);
            }
            _ => {
                base.insert(key.clone(), change.clone());
            }
        }
    }
}

/// Encode parameters as a query string with bracketed nested keys.
pub fn to_query(params: &Params) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        push_pairs(key, value, &mut pairs);
    }
    pairs.join("&")
}

fn push_pairs(key: &str, value: &JsonValue, pairs: &mut Vec<String>) {
    match value {
        JsonValue::Object(map) => {
            for (nested, value) in map {
                push_pairs(&format!("{key}[{nested}]"), value, pairs);
            }
        }
        JsonValue::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                push_pairs(&key, item, pairs);
            }
        }
        JsonValue::Null => pairs.push(format!("{}=", urlencoding::encode(key))),
        JsonValue::String(s) => pairs.push(format!(
            "{}={}",
            urlencoding::encode(key),
            urlencoding::encode(s)
        )),
        scalar => pairs.push(format!(
            "{}={}",
            urlencoding::encode(key),
            urlencoding::encode(&scalar.to_string())
        )),
    }
}
