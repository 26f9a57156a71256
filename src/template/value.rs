// ABOUTME: Compiled value templates for variable actions
// ABOUTME: Renders text or structured sources and reports unresolved lookups as a value

use handlebars::{Handlebars, RenderError, RenderErrorReason};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::context::{normalize_nulls, print_nulls, Params};
use super::engine::TemplateEngine;
use super::error::{Result, TemplateError};

const ROOT_TEMPLATE: &str = "root";

/// Raw template source as written in the action configuration
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    Text(String),
    /// Object or array whose string leaves are templates
    Structured(Value),
}

impl TemplateSource {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Err(TemplateError::NullSource),
            Value::String(text) => Ok(Self::Text(text)),
            structured @ (Value::Object(_) | Value::Array(_)) => Ok(Self::Structured(structured)),
            scalar => Ok(Self::Text(scalar.to_string())),
        }
    }
}

impl From<&str> for TemplateSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Outcome of rendering a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    /// The template referenced a name with no binding
    Unresolved,
}

impl Rendered {
    /// Non-empty rendered text
    pub fn is_truthy(&self) -> bool {
        matches!(self, Rendered::Text(text) if !text.is_empty())
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Rendered::Text(text) => Some(text),
            Rendered::Unresolved => None,
        }
    }
}

#[derive(Clone)]
pub struct ValueTemplate {
    source: TemplateSource,
    handlebars: Handlebars<'static>,
}

impl fmt::Debug for ValueTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTemplate")
            .field("source", &self.source)
            .finish()
    }
}

impl ValueTemplate {
    /// Compile a source with the default engine configuration
    pub fn new(source: impl Into<TemplateSource>) -> Result<Self> {
        TemplateEngine::new().compile(source.into())
    }

    pub(crate) fn compile(mut handlebars: Handlebars<'static>, source: TemplateSource) -> Result<Self> {
        match &source {
            TemplateSource::Text(text) => register(&mut handlebars, ROOT_TEMPLATE, text)?,
            TemplateSource::Structured(value) => register_leaves(&mut handlebars, value, "")?,
        }

        Ok(Self { source, handlebars })
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Render against the given params.
    ///
    /// Null bindings print as `None` but stay null for helpers and conditions. A lookup with no binding at all yields
    /// `Rendered::Unresolved`; any other engine failure is an error.
    pub fn render(&self, params: &Params) -> Result<Rendered> {
        let data = normalize_nulls(params);

        let outcome = match &self.source {
            TemplateSource::Text(_) => self
                .handlebars
                .render(ROOT_TEMPLATE, &data)
                .map(print_nulls),
            TemplateSource::Structured(value) => self
                .render_structure(value, "", &data)
                .map(|rendered| rendered.to_string()),
        };

        match outcome {
            Ok(text) => Ok(Rendered::Text(text)),
            Err(err) => match err.reason() {
                RenderErrorReason::MissingVariable(path) => {
                    debug!("Template lookup unresolved: {:?}", path);
                    Ok(Rendered::Unresolved)
                }
                _ => Err(TemplateError::RenderError(err.to_string())),
            },
        }
    }

    fn render_structure(
        &self,
        value: &Value,
        path: &str,
        data: &Value,
    ) -> std::result::Result<Value, RenderError> {
        match value {
            Value::String(_) => {
                let rendered = self.handlebars.render(path, data)?;
                Ok(Value::String(print_nulls(rendered)))
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.render_structure(item, &leaf_path(path, &index.to_string()), data))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut rendered = serde_json::Map::new();
                for (key, item) in map {
                    rendered.insert(
                        key.clone(),
                        self.render_structure(item, &leaf_path(path, key), data)?,
                    );
                }
                Ok(Value::Object(rendered))
            }
            other => Ok(other.clone()),
        }
    }
}

fn register(handlebars: &mut Handlebars<'static>, name: &str, text: &str) -> Result<()> {
    handlebars
        .register_template_string(name, text)
        .map_err(|e| TemplateError::SyntaxError {
            source_text: text.to_string(),
            message: e.to_string(),
        })
}

fn register_leaves(handlebars: &mut Handlebars<'static>, value: &Value, path: &str) -> Result<()> {
    match value {
        Value::String(text) => register(handlebars, path, text),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                register_leaves(handlebars, item, &leaf_path(path, &index.to_string()))?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for (key, item) in map {
                register_leaves(handlebars, item, &leaf_path(path, key))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// JSON pointer style name for a structured leaf
fn leaf_path(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, segment.replace('~', "~0").replace('/', "~1"))
}
