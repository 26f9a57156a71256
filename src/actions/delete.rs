// ABOUTME: Actions that remove persistent variables without any templating
// ABOUTME: Deleting an absent key and clearing an empty store are both no-ops

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::config::KeyActionConfig;
use super::error::Result;
use super::{Action, Command};
use crate::template::Params;
use crate::user::{TextPreprocessingResult, User};

pub const DELETE_VARIABLE: &str = "delete_variable";
pub const CLEAR_VARIABLES: &str = "clear_variables";

#[derive(Debug, Clone)]
pub struct DeleteVariableAction {
    key: String,
}

impl DeleteVariableAction {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn from_config(config: &Value) -> Result<Self> {
        let parsed = KeyActionConfig::from_value(DELETE_VARIABLE, config)?;
        Ok(Self::new(parsed.require_key(DELETE_VARIABLE)?))
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl Action for DeleteVariableAction {
    async fn run(
        &self,
        user: &mut User,
        _text: &TextPreprocessingResult,
        _params: Option<&Params>,
    ) -> Result<Vec<Command>> {
        debug!("Deleting variable '{}'", self.key);
        user.variables.delete(&self.key);
        Ok(Vec::new())
    }

    fn action_type(&self) -> &'static str {
        DELETE_VARIABLE
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClearVariablesAction;

impl ClearVariablesAction {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Action for ClearVariablesAction {
    async fn run(
        &self,
        user: &mut User,
        _text: &TextPreprocessingResult,
        _params: Option<&Params>,
    ) -> Result<Vec<Command>> {
        debug!("Clearing persistent variables for user '{}'", user.id);
        user.variables.clear();
        Ok(Vec::new())
    }

    fn action_type(&self) -> &'static str {
        CLEAR_VARIABLES
    }
}
