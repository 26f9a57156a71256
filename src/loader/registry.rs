// ABOUTME: Loader kinds and the name-to-loader registry shared by variable actions
// ABOUTME: Unknown names fall back to an identity loader unless the registry is strict

use serde_json::{Number, Value};
use std::collections::HashMap;
use tracing::warn;

use super::error::{LoaderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Json,
    Int,
    Float,
    /// Keeps the rendered text as a string
    Identity,
}

impl Loader {
    pub fn name(&self) -> &'static str {
        match self {
            Loader::Json => "json",
            Loader::Int => "int",
            Loader::Float => "float",
            Loader::Identity => "identity",
        }
    }

    /// Convert rendered text into a typed value
    pub fn load(&self, text: &str) -> Result<Value> {
        match self {
            Loader::Json => serde_json::from_str(text).map_err(|source| LoaderError::InvalidJson {
                input: text.to_string(),
                source,
            }),
            // Values outside i64 are a conversion error
            Loader::Int => text
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|source| LoaderError::InvalidInt {
                    input: text.to_string(),
                    source,
                }),
            Loader::Float => {
                let parsed = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|source| LoaderError::InvalidFloat {
                        input: text.to_string(),
                        source,
                    })?;
                Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| LoaderError::NonFiniteFloat {
                        input: text.to_string(),
                    })
            }
            Loader::Identity => Ok(Value::String(text.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Loader>,
    strict: bool,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            loaders: HashMap::new(),
            strict: false,
        };

        registry.register(Loader::Json);
        registry.register(Loader::Int);
        registry.register(Loader::Float);

        registry
    }

    /// Reject unknown loader names instead of falling back to identity
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn register(&mut self, loader: Loader) {
        self.loaders.insert(loader.name().to_string(), loader);
    }

    pub fn get(&self, name: &str) -> Option<Loader> {
        self.loaders.get(name).copied()
    }

    /// Resolve a configured loader name.
    ///
    /// `None` and the empty string mean no loader is configured.
    pub fn resolve(&self, name: Option<&str>) -> Result<Option<Loader>> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(None),
        };

        match self.get(name) {
            Some(loader) => Ok(Some(loader)),
            None if self.strict => Err(LoaderError::UnknownLoader {
                name: name.to_string(),
            }),
            None => {
                warn!(
                    "Unknown loader '{}', rendered values will be stored as text. Supported loaders: {:?}",
                    name,
                    self.list_supported()
                );
                Ok(Some(Loader::Identity))
            }
        }
    }

    pub fn list_supported(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loaders.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
