// ABOUTME: Error types for building and running scenario actions
// ABOUTME: Distinguishes load-time configuration faults from turn-level conversion faults

use thiserror::Error;

use crate::loader::LoaderError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Configuration error for action {action_type}: {message}")]
    ConfigError {
        action_type: String,
        message: String,
    },

    #[error("Action type not supported: {action_type}. Supported types: {supported_types:?}")]
    ActionNotSupported {
        action_type: String,
        supported_types: Vec<String>,
    },

    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),

    #[error("Cannot convert value for variable '{key}': {source}")]
    ConversionError { key: String, source: LoaderError },
}

impl ActionError {
    pub(crate) fn config(action_type: &str, message: impl Into<String>) -> Self {
        ActionError::ConfigError {
            action_type: action_type.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ActionError>;
