// ABOUTME: Parameter mappings handed to templates at render time
// ABOUTME: Marks null bindings for None output and merges param maps by precedence

use serde_json::{Map, Value};

/// Renderable parameters keyed by top-level name
pub type Params = Map<String, Value>;

/// What a null binding prints as
pub const NONE_LITERAL: &str = "None";

/// Stand-in for null inside the render data.
///
/// Handlebars prints null as an empty string, so nulls travel through
/// rendering as this marker. Printed output turns it into `None`; helpers
/// turn it back into null.
pub const NULL_MARKER: &str = "\u{1}None\u{1}";

/// Render data for `params` with every null replaced by the marker
pub fn normalize_nulls(params: &Params) -> Value {
    let mut value = Value::Object(params.clone());
    replace_nulls(&mut value);
    value
}

fn replace_nulls(value: &mut Value) {
    match value {
        Value::Null => *value = Value::String(NULL_MARKER.to_string()),
        Value::Array(items) => items.iter_mut().for_each(replace_nulls),
        Value::Object(map) => map.values_mut().for_each(replace_nulls),
        _ => {}
    }
}

/// Undo `normalize_nulls` on a value taken from the render data
pub fn restore_nulls(value: &Value) -> Value {
    match value {
        Value::String(text) if text == NULL_MARKER => Value::Null,
        Value::Array(items) => Value::Array(items.iter().map(restore_nulls).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), restore_nulls(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Whether a value from the render data stood for null
pub fn is_null_marker(value: &Value) -> bool {
    value.as_str() == Some(NULL_MARKER)
}

/// Print every null marker in rendered output as `None`
pub fn print_nulls(rendered: String) -> String {
    if rendered.contains(NULL_MARKER) {
        rendered.replace(NULL_MARKER, NONE_LITERAL)
    } else {
        rendered
    }
}

/// Merge two mappings; keys in `higher` overwrite keys in `lower`
pub fn merge_params(lower: Option<&Params>, higher: Params) -> Params {
    let mut merged = lower.cloned().unwrap_or_default();
    merged.extend(higher);
    merged
}
