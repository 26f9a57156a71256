// ABOUTME: Error types for template compilation and rendering
// ABOUTME: Separates syntax problems found at load time from render-time failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template syntax error in '{source_text}': {message}")]
    SyntaxError {
        source_text: String,
        message: String,
    },

    #[error("Template render error: {0}")]
    RenderError(String),

    #[error("Template source must not be null")]
    NullSource,
}

pub type Result<T> = std::result::Result<T, TemplateError>;
