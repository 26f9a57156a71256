// ABOUTME: Error types for loading and running action scripts
// ABOUTME: Wraps parse failures and action failures with the position of the failing action

use thiserror::Error;

use crate::actions::ActionError;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse script: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid script: {0}")]
    InvalidFormat(String),

    #[error("Action #{index} ({action_type}) failed: {source}")]
    ActionFailed {
        index: usize,
        action_type: String,
        source: ActionError,
    },
}

pub type Result<T> = std::result::Result<T, ScriptError>;
