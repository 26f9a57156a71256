// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides script builders, temp environments and fixed parametrizers

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

use scenario_vars::template::Params;
use scenario_vars::user::{Parametrizer, TextPreprocessingResult, User};

/// Parametrizer returning the same bindings for every call
pub struct FixedParametrizer(pub Params);

impl Parametrizer for FixedParametrizer {
    fn collect(&self, _user: &User, _text: &TextPreprocessingResult) -> Params {
        self.0.clone()
    }
}

pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("params must be an object, got {}", other),
    }
}

/// User whose parametrizer always yields `bindings`
pub fn user_with_bindings(bindings: Value) -> User {
    User::new("test-user").with_parametrizer(Arc::new(FixedParametrizer(params(bindings))))
}

pub struct TestScriptBuilder {
    name: String,
    user_params: Map<String, Value>,
    user_variables: Map<String, Value>,
    caller_params: Option<Map<String, Value>>,
    actions: Vec<Value>,
}

impl TestScriptBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            user_params: Map::new(),
            user_variables: Map::new(),
            caller_params: None,
            actions: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: Value) -> Self {
        self.user_params.insert(key.to_string(), value);
        self
    }

    pub fn with_variable(mut self, key: &str, value: Value) -> Self {
        self.user_variables.insert(key.to_string(), value);
        self
    }

    pub fn with_caller_param(mut self, key: &str, value: Value) -> Self {
        self.caller_params
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn add_action(mut self, action_type: &str, config: Value) -> Self {
        let mut action = params(config);
        action.insert("type".to_string(), json!(action_type));
        self.actions.push(Value::Object(action));
        self
    }

    pub fn set_variable(self, key: &str, value: &str, loader: Option<&str>) -> Self {
        let mut config = json!({"key": key, "value": value});
        if let Some(loader) = loader {
            config["loader"] = json!(loader);
        }
        self.add_action("set_variable", config)
    }

    pub fn generate_yaml(&self) -> String {
        let mut script = json!({
            "name": self.name,
            "user": {
                "params": self.user_params,
                "variables": self.user_variables,
            },
            "actions": self.actions,
        });
        if let Some(caller) = &self.caller_params {
            script["params"] = Value::Object(caller.clone());
        }

        serde_yaml::to_string(&script).expect("Failed to serialize script")
    }

    pub async fn write_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, self.generate_yaml()).await?;
        Ok(())
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn script_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.yaml", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_report.json", name))
    }

    pub async fn create_script_file(&self, name: &str, builder: &TestScriptBuilder) -> PathBuf {
        let script_file = self.script_file(name);
        builder
            .write_to_file(&script_file)
            .await
            .expect("Failed to write script file");
        script_file
    }
}

pub async fn read_json_output(
    file_path: &Path,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path).await?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_builder() {
        let yaml = TestScriptBuilder::new("builder")
            .with_param("user_age", json!("42"))
            .set_variable("age", "{{user_age}}", Some("int"))
            .generate_yaml();

        let parsed: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["name"], json!("builder"));
        assert_eq!(parsed["actions"][0]["type"], json!("set_variable"));
        assert_eq!(parsed["actions"][0]["loader"], json!("int"));
        assert!(parsed.get("params").is_none());
    }
}
