// ABOUTME: Parametrizers derive template params from user state and preprocessed text
// ABOUTME: The basic parametrizer exposes the stores, the message and the text at top level

use serde_json::Value;

use super::text::TextPreprocessingResult;
use super::User;
use crate::template::Params;

pub trait Parametrizer: Send + Sync {
    fn collect(&self, user: &User, text: &TextPreprocessingResult) -> Params;
}

/// Default parametrizer.
///
/// Exposes `message`, `user_id`, `variables`, `local_vars`, `mid_variables` and
/// `text_preprocessing_result`. Configured defaults sit underneath and are
/// shadowed by any of those names.
#[derive(Debug, Clone, Default)]
pub struct BasicParametrizer {
    defaults: Params,
}

impl BasicParametrizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: Params) -> Self {
        Self { defaults }
    }
}

impl Parametrizer for BasicParametrizer {
    fn collect(&self, user: &User, text: &TextPreprocessingResult) -> Params {
        let mut params = self.defaults.clone();

        params.insert("message".to_string(), user.message.clone());
        params.insert("user_id".to_string(), Value::String(user.id.clone()));
        params.insert(
            "variables".to_string(),
            Value::Object(user.variables.snapshot()),
        );
        params.insert(
            "local_vars".to_string(),
            Value::Object(user.local_vars.snapshot()),
        );
        params.insert(
            "mid_variables".to_string(),
            Value::Object(user.mid_variables.snapshot()),
        );
        params.insert(
            "text_preprocessing_result".to_string(),
            text.raw().clone(),
        );

        params
    }
}
