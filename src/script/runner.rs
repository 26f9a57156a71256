// ABOUTME: Runs an action script against a fresh in-memory user
// ABOUTME: Builds every action up front, runs them in order and reports the final stores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::action_script::ActionScript;
use super::error::{Result, ScriptError};
use crate::actions::{Action, ActionRegistry, Command};
use crate::template::Params;
use crate::user::{BasicParametrizer, TextPreprocessingResult, User, Variables};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptReport {
    pub script_name: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub actions_run: usize,
    pub commands: Vec<Command>,
    pub variables: Params,
    pub local_vars: Params,
    pub mid_variables: Params,
}

pub struct ScriptRunner {
    registry: ActionRegistry,
    default_ttl: Option<u64>,
}

impl ScriptRunner {
    pub fn new(registry: ActionRegistry) -> Self {
        Self {
            registry,
            default_ttl: None,
        }
    }

    /// Expiry applied to persistent variables written without a ttl
    pub fn with_default_ttl(mut self, default_ttl: Option<u64>) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    /// Build every action in the script, failing on the first bad definition
    pub fn build_actions(&self, script: &ActionScript) -> Result<Vec<Box<dyn Action>>> {
        script
            .actions
            .iter()
            .enumerate()
            .map(|(index, definition)| {
                self.registry
                    .build_definition(definition)
                    .map_err(|source| ScriptError::ActionFailed {
                        index,
                        action_type: definition.action_type.clone(),
                        source,
                    })
            })
            .collect()
    }

    /// Create the user described by the script
    pub fn build_user(&self, script: &ActionScript) -> User {
        let parametrizer = BasicParametrizer::with_defaults(script.user.params.clone());
        let mut user = User::new(script.user.id.clone())
            .with_message(script.user.message.clone())
            .with_variables(Box::new(Variables::new().with_default_ttl(self.default_ttl)))
            .with_parametrizer(Arc::new(parametrizer));

        for (key, value) in &script.user.variables {
            user.variables.set(key, value.clone(), None);
        }
        for (key, value) in &script.user.local_vars {
            user.local_vars.set(key, value.clone(), None);
        }

        user
    }

    pub async fn run(&self, script: &ActionScript) -> Result<ScriptReport> {
        let start_time = Utc::now();
        info!(
            "Running script '{}' with {} actions",
            script.name,
            script.actions.len()
        );

        let actions = self.build_actions(script)?;
        let mut user = self.build_user(script);
        let text = TextPreprocessingResult::new(script.text_preprocessing.clone());

        let mut commands = Vec::new();
        for (index, action) in actions.iter().enumerate() {
            debug!("Running action #{} ({})", index, action.action_type());
            let emitted = action
                .run(&mut user, &text, script.params.as_ref())
                .await
                .map_err(|source| ScriptError::ActionFailed {
                    index,
                    action_type: action.action_type().to_string(),
                    source,
                })?;
            commands.extend(emitted);
        }

        info!("Script '{}' completed", script.name);

        Ok(ScriptReport {
            script_name: script.name.clone(),
            user_id: user.id.clone(),
            start_time,
            end_time: Utc::now(),
            actions_run: actions.len(),
            commands,
            variables: user.variables.snapshot(),
            local_vars: user.local_vars.snapshot(),
            mid_variables: user.mid_variables.snapshot(),
        })
    }
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new(ActionRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionError;
    use crate::script::ScriptParser;
    use serde_json::json;

    fn parse(yaml: &str) -> ActionScript {
        ScriptParser::new().parse_string(yaml).unwrap()
    }

    #[tokio::test]
    async fn test_run_script() {
        let script = parse(
            r#"
name: profile
user:
  params:
    user_age: "42"
    city: Oslo
  variables:
    stale: "yes"
actions:
  - type: set_variable
    key: age
    value: "{{user_age}}"
    loader: int
  - type: set_local_variable
    key: city
    value: "{{upper city}}"
  - type: set_mid_variable
    key: form
    value: '{"age": {{variables.age}} }'
    loader: json
  - type: delete_variable
    key: stale
"#,
        );

        let report = ScriptRunner::default().run(&script).await.unwrap();

        assert_eq!(report.actions_run, 4);
        assert!(report.commands.is_empty());
        assert_eq!(report.variables["age"], json!(42));
        assert!(!report.variables.contains_key("stale"));
        assert_eq!(report.local_vars["city"], json!("OSLO"));
        assert_eq!(report.mid_variables["form"], json!({"age": 42}));
    }

    #[tokio::test]
    async fn test_caller_params_reach_mid_variables_only() {
        let script = parse(
            r#"
name: overlay
params:
  channel: sms
actions:
  - type: set_variable
    key: persistent_channel
    value: "{{channel}}"
  - type: set_mid_variable
    key: mid_channel
    value: "{{channel}}"
"#,
        );

        let report = ScriptRunner::default().run(&script).await.unwrap();

        assert_eq!(report.variables["persistent_channel"], serde_json::Value::Null);
        assert_eq!(report.mid_variables["mid_channel"], json!("sms"));
    }

    #[tokio::test]
    async fn test_bad_definition_fails_before_running() {
        let script = parse(
            r#"
name: broken
user:
  variables:
    keep: me
actions:
  - type: clear_variables
  - type: set_variable
    value: "missing key"
"#,
        );

        let runner = ScriptRunner::default();
        let result = runner.run(&script).await;

        assert!(matches!(
            result,
            Err(ScriptError::ActionFailed { index: 1, source: ActionError::ConfigError { .. }, .. })
        ));
    }

    #[tokio::test]
    async fn test_conversion_error_reports_action() {
        let script = parse(
            r#"
name: bad-int
user:
  params:
    n: abc
actions:
  - type: set_variable
    key: n
    value: "{{n}}"
    loader: int
"#,
        );

        let result = ScriptRunner::default().run(&script).await;

        assert!(matches!(
            result,
            Err(ScriptError::ActionFailed { index: 0, source: ActionError::ConversionError { .. }, .. })
        ));
    }

    #[test]
    fn test_build_user_seeds_stores() {
        let script = parse(
            r#"
name: seed
user:
  id: u-1
  variables:
    a: 1
  local_vars:
    b: 2
actions:
  - type: clear_variables
"#,
        );

        let user = ScriptRunner::default().build_user(&script);
        assert_eq!(user.id, "u-1");
        assert_eq!(user.variables.get("a"), Some(json!(1)));
        assert_eq!(user.local_vars.get("b"), Some(json!(2)));
    }
}
