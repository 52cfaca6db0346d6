//! Common types used throughout the SDK
//!
//! Parameter sets and records are both thin wrappers over `serde_json`
//! values so that caller options, session defaults and YAML configuration
//! can be merged without conversion.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A single record returned by the gateway, with fields in server order
pub type Record = JsonObject;

// ============================================================================
// Parameter Set
// ============================================================================

/// Option name to value mapping supplied by callers and sessions
///
/// Merging always lets the receiver's values win, so
/// `params.merged_over(&session)` yields the session defaults overridden by
/// every key the caller set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(JsonObject);

impl Params {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.0.remove(key)
    }

    /// Raw value lookup
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Return a copy of `defaults` with every key of `self` laid over it
    pub fn merged_over(&self, defaults: &Params) -> Params {
        let mut merged = defaults.clone();
        for (key, value) in &self.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// String value; numbers and booleans are rendered, null reads as absent
    pub fn get_str(&self, key: &str) -> Result<Option<String>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(Error::invalid_value(
                key,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// String value that must be present and non-empty
    pub fn require_str(&self, key: &str) -> Result<String> {
        match self.get_str(key)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(Error::missing_field(key)),
        }
    }

    /// Unsigned integer value; numeric strings are accepted
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
                Error::invalid_value(key, format!("expected a non-negative integer, got {n}"))
            }),
            Some(Value::String(s)) => s.trim().parse::<u64>().map(Some).map_err(|_| {
                Error::invalid_value(key, format!("expected a non-negative integer, got '{s}'"))
            }),
            Some(other) => Err(Error::invalid_value(
                key,
                format!("expected a non-negative integer, got {other}"),
            )),
        }
    }

    /// Boolean value; "true"/"false" strings are accepted
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(Error::invalid_value(
                    key,
                    format!("expected a boolean, got '{s}'"),
                )),
            },
            Some(other) => Err(Error::invalid_value(
                key,
                format!("expected a boolean, got {other}"),
            )),
        }
    }

    /// List of strings; a single string is split on commas
    pub fn get_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(Error::invalid_value(
                        key,
                        format!("expected a list of strings, found {other}"),
                    )),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(other) => Err(Error::invalid_value(
                key,
                format!("expected a list, got {other}"),
            )),
        }
    }
}

impl From<JsonObject> for Params {
    fn from(map: JsonObject) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_merged_over_caller_wins() {
        let session = Params::new()
            .with("sender_id", "sender")
            .with("endpoint_url", "https://api.intacct.com/ia/xml/xmlgw.phtml")
            .with("control_id", "session-control");
        let params = Params::new()
            .with("view", "CUSTOMER#123")
            .with("control_id", "caller-control");

        let merged = params.merged_over(&session);

        assert_eq!(merged.len(), 4);
        assert_eq!(merged.get_str("control_id").unwrap().unwrap(), "caller-control");
        assert_eq!(merged.get_str("sender_id").unwrap().unwrap(), "sender");
        assert_eq!(merged.get_str("view").unwrap().unwrap(), "CUSTOMER#123");
    }

    #[test]
    fn test_merged_over_leaves_inputs_untouched() {
        let defaults = Params::new().with("max_total_count", 100_000);
        let params = Params::new().with("max_total_count", 10);

        let merged = params.merged_over(&defaults);

        assert_eq!(merged.get_u64("max_total_count").unwrap(), Some(10));
        assert_eq!(defaults.get_u64("max_total_count").unwrap(), Some(100_000));
    }

    #[test]
    fn test_get_u64_accepts_numeric_strings() {
        let params = Params::new().with("page_size", "250").with("bad", "abc");
        assert_eq!(params.get_u64("page_size").unwrap(), Some(250));
        assert_eq!(params.get_u64("missing").unwrap(), None);
        assert!(matches!(
            params.get_u64("bad"),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_get_u64_rejects_negative() {
        let params = Params::new().with("page_size", -5);
        assert!(params.get_u64("page_size").is_err());
    }

    #[test]
    fn test_require_str() {
        let params = Params::new().with("view", "").with("object", "CUSTOMER");
        assert!(matches!(
            params.require_str("view"),
            Err(Error::MissingConfigField { field }) if field == "view"
        ));
        assert!(params.require_str("relation").is_err());
        assert_eq!(params.require_str("object").unwrap(), "CUSTOMER");
    }

    #[test]
    fn test_get_list_from_array_and_string() {
        let params = Params::new()
            .with("fields", json!(["RECORDNO", "NAME"]))
            .with("keys", "1, 2,3");

        assert_eq!(
            params.get_list("fields").unwrap().unwrap(),
            vec!["RECORDNO", "NAME"]
        );
        assert_eq!(params.get_list("keys").unwrap().unwrap(), vec!["1", "2", "3"]);
        assert_eq!(params.get_list("missing").unwrap(), None);
    }

    #[test]
    fn test_get_bool() {
        let params = Params::new()
            .with("transaction", true)
            .with("unique_id", "FALSE")
            .with("bad", 3);
        assert_eq!(params.get_bool("transaction").unwrap(), Some(true));
        assert_eq!(params.get_bool("unique_id").unwrap(), Some(false));
        assert!(params.get_bool("bad").is_err());
    }

    #[test]
    fn test_params_deserialize_from_json() {
        let params: Params =
            serde_json::from_value(json!({"view": "V", "page_size": 10})).unwrap();
        assert_eq!(params.get_str("view").unwrap().as_deref(), Some("V"));
        assert_eq!(params.get_u64("page_size").unwrap(), Some(10));
    }
}
