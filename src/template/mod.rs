// ABOUTME: Template module for resolving action values against scenario params
// ABOUTME: Provides the configured Handlebars engine and compiled value templates

pub mod context;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod value;

pub use context::{merge_params, normalize_nulls, Params, NONE_LITERAL};
pub use engine::TemplateEngine;
pub use error::{Result, TemplateError};
pub use value::{Rendered, TemplateSource, ValueTemplate};
