// ABOUTME: Text preprocessing result handed to actions alongside the user
// ABOUTME: Wraps the raw preprocessing JSON produced upstream of the scenario runtime

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextPreprocessingResult {
    raw: Value,
}

impl TextPreprocessingResult {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn original_text(&self) -> Option<&str> {
        self.raw.get("original_text").and_then(Value::as_str)
    }

    pub fn normalized_text(&self) -> Option<&str> {
        self.raw.get("normalized_text").and_then(Value::as_str)
    }
}
