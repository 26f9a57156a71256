// ABOUTME: Variable assignment actions for the persistent, local and mid-dialog scopes
// ABOUTME: Renders the value template, applies the loader and writes to exactly one store

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::config::VariableActionConfig;
use super::error::{ActionError, Result};
use super::{Action, Command};
use crate::loader::{Loader, LoaderRegistry};
use crate::template::{merge_params, Params, Rendered, TemplateEngine, TemplateSource, ValueTemplate};
use crate::user::{TextPreprocessingResult, User};

pub const SET_VARIABLE: &str = "set_variable";
pub const SET_LOCAL_VARIABLE: &str = "set_local_variable";
pub const SET_MID_VARIABLE: &str = "set_mid_variable";

/// Where render params come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsSource {
    /// Parametrizer output only; caller params are dropped
    Collected,
    /// Caller params overlaid by parametrizer output
    CallerThenCollected,
}

/// Which render failures turn into `none`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFailure {
    UnresolvedOnly,
    Any,
}

/// What a configured loader does with empty or missing text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FalsyWithLoader {
    StoreNone,
    KeepRendered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopePolicy {
    pub params: ParamsSource,
    pub failure: RenderFailure,
    pub falsy: FalsyWithLoader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableScope {
    Persistent { ttl: Option<u64> },
    Local,
    Mid,
}

impl VariableScope {
    pub fn action_type(&self) -> &'static str {
        match self {
            VariableScope::Persistent { .. } => SET_VARIABLE,
            VariableScope::Local => SET_LOCAL_VARIABLE,
            VariableScope::Mid => SET_MID_VARIABLE,
        }
    }

    pub fn policy(&self) -> ScopePolicy {
        match self {
            VariableScope::Persistent { .. } | VariableScope::Local => ScopePolicy {
                params: ParamsSource::Collected,
                failure: RenderFailure::UnresolvedOnly,
                falsy: FalsyWithLoader::StoreNone,
            },
            VariableScope::Mid => ScopePolicy {
                params: ParamsSource::CallerThenCollected,
                failure: RenderFailure::Any,
                falsy: FalsyWithLoader::KeepRendered,
            },
        }
    }

    fn write(&self, user: &mut User, key: &str, value: Value) {
        match self {
            VariableScope::Persistent { ttl } => user.variables.set(key, value, *ttl),
            VariableScope::Local => user.local_vars.set(key, value, None),
            VariableScope::Mid => user.mid_variables.update(key, value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SetVariableAction {
    key: String,
    template: ValueTemplate,
    loader: Option<Loader>,
    scope: VariableScope,
}

impl SetVariableAction {
    pub fn new(
        key: impl Into<String>,
        template: ValueTemplate,
        loader: Option<Loader>,
        scope: VariableScope,
    ) -> Self {
        Self {
            key: key.into(),
            template,
            loader,
            scope,
        }
    }

    /// Build a `set_variable` action writing to the persistent store
    pub fn persistent(
        config: &Value,
        loaders: &LoaderRegistry,
        engine: &TemplateEngine,
    ) -> Result<Self> {
        let parsed = VariableActionConfig::from_value(SET_VARIABLE, config)?;
        let scope = VariableScope::Persistent { ttl: parsed.ttl };
        Self::from_parsed(&parsed, scope, loaders, engine)
    }

    pub fn local(config: &Value, loaders: &LoaderRegistry, engine: &TemplateEngine) -> Result<Self> {
        let parsed = VariableActionConfig::from_value(SET_LOCAL_VARIABLE, config)?;
        Self::from_parsed(&parsed, VariableScope::Local, loaders, engine)
    }

    pub fn mid(config: &Value, loaders: &LoaderRegistry, engine: &TemplateEngine) -> Result<Self> {
        let parsed = VariableActionConfig::from_value(SET_MID_VARIABLE, config)?;
        Self::from_parsed(&parsed, VariableScope::Mid, loaders, engine)
    }

    fn from_parsed(
        config: &VariableActionConfig,
        scope: VariableScope,
        loaders: &LoaderRegistry,
        engine: &TemplateEngine,
    ) -> Result<Self> {
        let action_type = scope.action_type();
        let key = config.require_key(action_type)?;
        let value = config.require_value(action_type)?;

        let source = TemplateSource::from_value(value.clone())
            .map_err(|e| ActionError::config(action_type, e.to_string()))?;
        let template = engine
            .compile(source)
            .map_err(|e| ActionError::config(action_type, e.to_string()))?;
        let loader = loaders
            .resolve(config.loader.as_deref())
            .map_err(|e| ActionError::config(action_type, e.to_string()))?;

        Ok(Self::new(key, template, loader, scope))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn scope(&self) -> &VariableScope {
        &self.scope
    }

    pub fn loader(&self) -> Option<Loader> {
        self.loader
    }

    /// Compute the value this action would store, without writing it
    pub fn resolve(
        &self,
        user: &User,
        text: &TextPreprocessingResult,
        params: Option<&Params>,
    ) -> Result<Value> {
        let policy = self.scope.policy();

        let collected = user.collect_params(text);
        let render_params = match policy.params {
            ParamsSource::Collected => collected,
            ParamsSource::CallerThenCollected => merge_params(params, collected),
        };

        let rendered = match self.template.render(&render_params) {
            Ok(rendered) => rendered,
            Err(e) if policy.failure == RenderFailure::Any => {
                debug!("Render failed for '{}', storing none: {}", self.key, e);
                Rendered::Unresolved
            }
            Err(e) => return Err(e.into()),
        };

        self.load(rendered, policy.falsy)
    }

    fn load(&self, rendered: Rendered, falsy: FalsyWithLoader) -> Result<Value> {
        let loader = match self.loader {
            Some(loader) => loader,
            None => return Ok(rendered_value(rendered)),
        };

        if rendered.is_truthy() {
            let text = rendered.into_text().unwrap_or_default();
            return loader
                .load(&text)
                .map_err(|source| ActionError::ConversionError {
                    key: self.key.clone(),
                    source,
                });
        }

        match falsy {
            FalsyWithLoader::StoreNone => Ok(Value::Null),
            FalsyWithLoader::KeepRendered => Ok(rendered_value(rendered)),
        }
    }
}

fn rendered_value(rendered: Rendered) -> Value {
    rendered.into_text().map_or(Value::Null, Value::String)
}

#[async_trait]
impl Action for SetVariableAction {
    async fn run(
        &self,
        user: &mut User,
        text: &TextPreprocessingResult,
        params: Option<&Params>,
    ) -> Result<Vec<Command>> {
        let value = self.resolve(user, text, params)?;

        debug!(
            "Setting variable '{}' via {} to {}",
            self.key,
            self.action_type(),
            value
        );
        self.scope.write(user, &self.key, value);

        Ok(Vec::new())
    }

    fn action_type(&self) -> &'static str {
        self.scope.action_type()
    }
}
