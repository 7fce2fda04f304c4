//! # Session Configuration Model
//!
//! Default header values and the variable table, persisted as `config.json`.

use crate::repl::pipeline::VariableTable;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Accept value used until the user sets another one
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Header defaults applied by the request augmenter. Empty means unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultHeaders {
    pub authorization: String,
    pub accept: String,
    pub content_type: String,
}

impl Default for DefaultHeaders {
    fn default() -> Self {
        Self {
            authorization: String::new(),
            accept: DEFAULT_ACCEPT.to_string(),
            content_type: String::new(),
        }
    }
}

impl DefaultHeaders {
    pub fn get(&self, header: DefaultHeader) -> &str {
        match header {
            DefaultHeader::Authorization => &self.authorization,
            DefaultHeader::Accept => &self.accept,
            DefaultHeader::ContentType => &self.content_type,
        }
    }

    pub fn set(&mut self, header: DefaultHeader, value: String) {
        match header {
            DefaultHeader::Authorization => self.authorization = value,
            DefaultHeader::Accept => self.accept = value,
            DefaultHeader::ContentType => self.content_type = value,
        }
    }
}

/// Headers that have a configurable default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultHeader {
    Authorization,
    Accept,
    ContentType,
}

impl DefaultHeader {
    pub const ALL: [DefaultHeader; 3] = [
        DefaultHeader::Authorization,
        DefaultHeader::Accept,
        DefaultHeader::ContentType,
    ];

    /// Header name as sent on the wire
    pub fn header_name(self) -> &'static str {
        match self {
            DefaultHeader::Authorization => "Authorization",
            DefaultHeader::Accept => "Accept",
            DefaultHeader::ContentType => "Content-Type",
        }
    }

    /// Text shown when no default is configured
    pub fn unset_label(self) -> &'static str {
        match self {
            DefaultHeader::ContentType => "(auto: JSON for -d)",
            _ => "(none)",
        }
    }
}

impl fmt::Display for DefaultHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

/// Everything stored in `config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub defaults: DefaultHeaders,
    #[serde(deserialize_with = "deserialize_variables")]
    pub vars: VariableTable,
}

/// Accept hand-edited numbers and booleans as variable values
fn deserialize_variables<'de, D>(deserializer: D) -> Result<VariableTable, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_should_accept_json_only() {
        let config = SessionConfig::default();
        assert_eq!(config.defaults.accept, "application/json");
        assert!(config.defaults.authorization.is_empty());
        assert!(config.defaults.content_type.is_empty());
        assert!(config.vars.is_empty());
    }

    #[test]
    fn config_should_fill_missing_fields_with_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"defaults": {"authorization": "Bearer x"}}"#).unwrap();
        assert_eq!(config.defaults.authorization, "Bearer x");
        assert_eq!(config.defaults.accept, "application/json");
    }

    #[test]
    fn config_should_stringify_non_string_variables() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"vars": {"id": 42, "flag": true, "name": "bob"}}"#).unwrap();
        assert_eq!(config.vars["id"], "42");
        assert_eq!(config.vars["flag"], "true");
        assert_eq!(config.vars["name"], "bob");
    }

    #[test]
    fn config_should_write_variables_sorted_by_key() {
        let mut config = SessionConfig::default();
        config.vars.insert("zeta".to_string(), "1".to_string());
        config.vars.insert("alpha".to_string(), "2".to_string());

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""vars":{"alpha":"2","zeta":"1"}"#));
    }

    #[test]
    fn default_headers_should_set_and_get_by_kind() {
        let mut headers = DefaultHeaders::default();
        headers.set(DefaultHeader::ContentType, "text/plain".to_string());
        assert_eq!(headers.get(DefaultHeader::ContentType), "text/plain");
        assert_eq!(DefaultHeader::ContentType.to_string(), "Content-Type");
    }
}
