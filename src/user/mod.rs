// ABOUTME: Per-conversation user context that variable actions operate on
// ABOUTME: Exports the user, the parametrizer seam and the variable store seams

pub mod parametrizer;
pub mod store;
pub mod text;

pub use parametrizer::{BasicParametrizer, Parametrizer};
pub use store::{LocalVariables, MidVariableStore, MidVariables, VariableStore, Variables};
pub use text::TextPreprocessingResult;

use serde_json::Value;
use std::sync::Arc;

use crate::template::Params;

/// One user's conversation state.
///
/// Each user owns its stores; actions get exclusive access through `&mut User`.
pub struct User {
    pub id: String,
    pub message: Value,
    pub variables: Box<dyn VariableStore>,
    pub local_vars: Box<dyn VariableStore>,
    pub mid_variables: Box<dyn MidVariableStore>,
    parametrizer: Arc<dyn Parametrizer>,
}

impl User {
    /// User backed by in-memory stores and the basic parametrizer
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: Value::Null,
            variables: Box::new(Variables::new()),
            local_vars: Box::new(LocalVariables::new()),
            mid_variables: Box::new(MidVariables::new()),
            parametrizer: Arc::new(BasicParametrizer::new()),
        }
    }

    pub fn with_message(mut self, message: Value) -> Self {
        self.message = message;
        self
    }

    pub fn with_parametrizer(mut self, parametrizer: Arc<dyn Parametrizer>) -> Self {
        self.parametrizer = parametrizer;
        self
    }

    pub fn with_variables(mut self, variables: Box<dyn VariableStore>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_local_vars(mut self, local_vars: Box<dyn VariableStore>) -> Self {
        self.local_vars = local_vars;
        self
    }

    pub fn with_mid_variables(mut self, mid_variables: Box<dyn MidVariableStore>) -> Self {
        self.mid_variables = mid_variables;
        self
    }

    /// Collect renderable params for this user and the current text
    pub fn collect_params(&self, text: &TextPreprocessingResult) -> Params {
        self.parametrizer.collect(self, text)
    }
}
