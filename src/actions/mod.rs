// ABOUTME: Scenario actions that assign, delete and clear user variables
// ABOUTME: Defines the Action trait, emitted commands and the registry that builds actions from config

pub mod config;
pub mod delete;
pub mod error;
pub mod variable;

pub use config::{KeyActionConfig, VariableActionConfig};
pub use delete::{ClearVariablesAction, DeleteVariableAction};
pub use error::{ActionError, Result};
pub use variable::{SetVariableAction, VariableScope};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::loader::LoaderRegistry;
use crate::template::{Params, TemplateEngine};
use crate::user::{TextPreprocessingResult, User};

/// Command emitted by an action for the scenario runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub payload: Value,
}

#[async_trait]
pub trait Action: Send + Sync {
    async fn run(
        &self,
        user: &mut User,
        text: &TextPreprocessingResult,
        params: Option<&Params>,
    ) -> Result<Vec<Command>>;

    fn action_type(&self) -> &'static str;
}

/// An action as written in a script: its type plus the remaining config fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(flatten)]
    pub config: serde_json::Map<String, Value>,
}

pub type ActionBuilder =
    fn(&Value, &LoaderRegistry, &TemplateEngine) -> Result<Box<dyn Action>>;

pub struct ActionRegistry {
    builders: HashMap<String, ActionBuilder>,
    loaders: Arc<LoaderRegistry>,
    engine: TemplateEngine,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::with_loaders(Arc::new(LoaderRegistry::new()))
    }

    /// Registry whose variable actions all share `loaders`
    pub fn with_loaders(loaders: Arc<LoaderRegistry>) -> Self {
        let mut registry = Self {
            builders: HashMap::new(),
            loaders,
            engine: TemplateEngine::new(),
        };

        registry.register(variable::SET_VARIABLE, build_set_variable);
        registry.register(variable::SET_LOCAL_VARIABLE, build_set_local_variable);
        registry.register(variable::SET_MID_VARIABLE, build_set_mid_variable);
        registry.register(delete::DELETE_VARIABLE, build_delete_variable);
        registry.register(delete::CLEAR_VARIABLES, build_clear_variables);

        registry
    }

    pub fn register(&mut self, action_type: &str, builder: ActionBuilder) {
        self.builders.insert(action_type.to_string(), builder);
    }

    pub fn loaders(&self) -> &Arc<LoaderRegistry> {
        &self.loaders
    }

    pub fn build(&self, action_type: &str, config: &Value) -> Result<Box<dyn Action>> {
        match self.builders.get(action_type) {
            Some(builder) => builder(config, &self.loaders, &self.engine),
            None => Err(ActionError::ActionNotSupported {
                action_type: action_type.to_string(),
                supported_types: self
                    .list_supported_actions()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }),
        }
    }

    pub fn build_definition(&self, definition: &ActionDefinition) -> Result<Box<dyn Action>> {
        self.build(
            &definition.action_type,
            &Value::Object(definition.config.clone()),
        )
    }

    pub fn list_supported_actions(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.builders.keys().map(|k| k.as_str()).collect();
        types.sort_unstable();
        types
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn build_set_variable(
    config: &Value,
    loaders: &LoaderRegistry,
    engine: &TemplateEngine,
) -> Result<Box<dyn Action>> {
    Ok(Box::new(SetVariableAction::persistent(config, loaders, engine)?))
}

fn build_set_local_variable(
    config: &Value,
    loaders: &LoaderRegistry,
    engine: &TemplateEngine,
) -> Result<Box<dyn Action>> {
    Ok(Box::new(SetVariableAction::local(config, loaders, engine)?))
}

fn build_set_mid_variable(
    config: &Value,
    loaders: &LoaderRegistry,
    engine: &TemplateEngine,
) -> Result<Box<dyn Action>> {
    Ok(Box::new(SetVariableAction::mid(config, loaders, engine)?))
}

fn build_delete_variable(
    config: &Value,
    _loaders: &LoaderRegistry,
    _engine: &TemplateEngine,
) -> Result<Box<dyn Action>> {
    Ok(Box::new(DeleteVariableAction::from_config(config)?))
}

fn build_clear_variables(
    _config: &Value,
    _loaders: &LoaderRegistry,
    _engine: &TemplateEngine,
) -> Result<Box<dyn Action>> {
    Ok(Box::new(ClearVariablesAction::new()))
}
