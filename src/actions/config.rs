// ABOUTME: Configuration surface accepted by variable actions at load time
// ABOUTME: Parses {key, value, loader, ttl} objects and enforces required fields

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ActionError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableActionConfig {
    #[serde(default)]
    pub key: Option<String>,
    /// Template source, a string or a structured value
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub loader: Option<String>,
    /// Seconds until the variable expires, persistent scope only
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl VariableActionConfig {
    pub fn from_value(action_type: &str, config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone())
            .map_err(|e| ActionError::config(action_type, format!("Invalid configuration: {}", e)))
    }

    pub fn require_key(&self, action_type: &str) -> Result<&str> {
        check_key(action_type, self.key.as_deref())
    }

    pub fn require_value(&self, action_type: &str) -> Result<&Value> {
        self.value
            .as_ref()
            .ok_or_else(|| ActionError::config(action_type, "Missing required field 'value'"))
    }
}

/// Configuration of actions that only name a variable; other fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyActionConfig {
    #[serde(default)]
    pub key: Option<String>,
}

impl KeyActionConfig {
    pub fn from_value(action_type: &str, config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone())
            .map_err(|e| ActionError::config(action_type, format!("Invalid configuration: {}", e)))
    }

    pub fn require_key(&self, action_type: &str) -> Result<&str> {
        check_key(action_type, self.key.as_deref())
    }
}

fn check_key<'a>(action_type: &str, key: Option<&'a str>) -> Result<&'a str> {
    match key {
        Some(key) if !key.is_empty() => Ok(key),
        Some(_) => Err(ActionError::config(action_type, "Field 'key' must not be empty")),
        None => Err(ActionError::config(action_type, "Missing required field 'key'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_config() {
        let config = VariableActionConfig::from_value(
            "set_variable",
            &json!({"key": "age", "value": "{{user_age}}", "loader": "int", "ttl": 3600}),
        )
        .unwrap();

        assert_eq!(config.require_key("set_variable").unwrap(), "age");
        assert_eq!(config.require_value("set_variable").unwrap(), &json!("{{user_age}}"));
        assert_eq!(config.loader.as_deref(), Some("int"));
        assert_eq!(config.ttl, Some(3600));
    }

    #[test]
    fn test_missing_required_fields() {
        let config = VariableActionConfig::from_value("set_variable", &json!({})).unwrap();

        assert!(matches!(
            config.require_key("set_variable"),
            Err(ActionError::ConfigError { .. })
        ));
        assert!(config.require_value("set_variable").is_err());
    }

    #[test]
    fn test_null_value_counts_as_missing() {
        let config =
            VariableActionConfig::from_value("set_variable", &json!({"key": "a", "value": null}))
                .unwrap();
        assert!(config.require_value("set_variable").is_err());
    }

    #[test]
    fn test_invalid_ttl_rejected() {
        let result = VariableActionConfig::from_value(
            "set_variable",
            &json!({"key": "a", "value": "x", "ttl": -5}),
        );
        assert!(matches!(result, Err(ActionError::ConfigError { .. })));
    }

    #[test]
    fn test_key_config_ignores_other_fields() {
        let config = KeyActionConfig::from_value(
            "delete_variable",
            &json!({"key": "age", "ttl": "1h", "loader": 5}),
        )
        .unwrap();
        assert_eq!(config.require_key("delete_variable").unwrap(), "age");

        let empty = KeyActionConfig::from_value("delete_variable", &json!({})).unwrap();
        assert!(empty.require_key("delete_variable").is_err());
    }
}
