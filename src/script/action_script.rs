// ABOUTME: Action script data structures and YAML parsing
// ABOUTME: Describes the starting user state, the caller params and the actions to run

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

use super::error::{Result, ScriptError};
use crate::actions::ActionDefinition;
use crate::template::Params;

fn default_user_id() -> String {
    "script-user".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionScript {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub user: ScriptUser,
    /// Raw text preprocessing result passed to every action
    #[serde(default)]
    pub text_preprocessing: Value,
    /// Caller params overlay passed to every action
    pub params: Option<Params>,
    pub actions: Vec<ActionDefinition>,
}

/// Starting state of the user the script runs against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptUser {
    #[serde(default = "default_user_id")]
    pub id: String,
    #[serde(default)]
    pub message: Value,
    /// Bindings exposed to templates by the parametrizer
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub variables: Params,
    #[serde(default)]
    pub local_vars: Params,
}

impl Default for ScriptUser {
    fn default() -> Self {
        Self {
            id: default_user_id(),
            message: Value::Null,
            params: Params::new(),
            variables: Params::new(),
            local_vars: Params::new(),
        }
    }
}

impl ActionScript {
    /// Parse a script from YAML (or JSON) text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let script: ActionScript = serde_yaml::from_str(content)?;
        script.validate_structure()?;
        Ok(script)
    }

    fn validate_structure(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ScriptError::InvalidFormat("name cannot be empty".to_string()));
        }

        if self.actions.is_empty() {
            return Err(ScriptError::InvalidFormat(
                "script defines no actions".to_string(),
            ));
        }

        Ok(())
    }

    /// Add bindings to the user params, overriding existing ones
    pub fn merge_params(&mut self, params: Params) {
        self.user.params.extend(params);
    }
}

pub struct ScriptParser;

impl ScriptParser {
    pub fn new() -> Self {
        Self
    }

    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ActionScript> {
        let content = fs::read_to_string(path.as_ref()).await?;
        self.parse_string(&content)
    }

    pub fn parse_string(&self, content: &str) -> Result<ActionScript> {
        ActionScript::from_yaml(content)
    }
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCRIPT: &str = r#"
name: onboarding
description: Ask for the user's age

user:
  id: user-42
  message:
    channel: web
  params:
    user_age: "42"
  variables:
    greeting: hello

text_preprocessing:
  original_text: I am 42

params:
  source: caller

actions:
  - type: set_variable
    key: age
    value: "{{user_age}}"
    loader: int
    ttl: 3600
  - type: delete_variable
    key: greeting
"#;

    #[test]
    fn test_parse_script() {
        let script = ScriptParser::new().parse_string(SCRIPT).unwrap();

        assert_eq!(script.name, "onboarding");
        assert_eq!(script.user.id, "user-42");
        assert_eq!(script.user.params["user_age"], json!("42"));
        assert_eq!(script.user.variables["greeting"], json!("hello"));
        assert_eq!(script.text_preprocessing["original_text"], json!("I am 42"));
        assert_eq!(script.params.as_ref().unwrap()["source"], json!("caller"));
        assert_eq!(script.actions.len(), 2);
        assert_eq!(script.actions[0].action_type, "set_variable");
        assert_eq!(script.actions[0].config["ttl"], json!(3600));
    }

    #[test]
    fn test_defaults() {
        let script = ScriptParser::new()
            .parse_string("name: minimal\nactions:\n  - type: clear_variables\n")
            .unwrap();

        assert_eq!(script.user.id, "script-user");
        assert!(script.params.is_none());
        assert_eq!(script.text_preprocessing, Value::Null);
    }

    #[test]
    fn test_rejects_empty_actions() {
        let result = ScriptParser::new().parse_string("name: empty\nactions: []\n");
        assert!(matches!(result, Err(ScriptError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_missing_action_type() {
        let result = ScriptParser::new().parse_string("name: x\nactions:\n  - key: a\n");
        assert!(matches!(result, Err(ScriptError::YamlError(_))));
    }

    #[tokio::test]
    async fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();

        let script = ScriptParser::new().parse_file(file.path()).await.unwrap();
        assert_eq!(script.name, "onboarding");
    }

    #[test]
    fn test_merge_params_overrides() {
        let mut script = ScriptParser::new().parse_string(SCRIPT).unwrap();
        let mut extra = Params::new();
        extra.insert("user_age".to_string(), json!("50"));

        script.merge_params(extra);
        assert_eq!(script.user.params["user_age"], json!("50"));
    }
}
