// ABOUTME: Variable store seams and their in-memory implementations
// ABOUTME: Covers persistent variables with expiry, step-local variables and mid-dialog variables

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::template::Params;

/// Upper bound applied to ttl values before computing an expiry
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

pub trait VariableStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value, ttl: Option<u64>);
    /// Removing an absent key is a no-op
    fn delete(&mut self, key: &str);
    fn clear(&mut self);
    /// All live entries, for exposing to templates
    fn snapshot(&self) -> Params;
}

pub trait MidVariableStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    /// Merge `value` into whatever is stored under `key`
    fn update(&mut self, key: &str, value: Value);
    fn snapshot(&self) -> Params;
}

#[derive(Debug, Clone)]
struct StoredVariable {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredVariable {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// Persistent variables with optional expiry
#[derive(Debug, Clone, Default)]
pub struct Variables {
    entries: HashMap<String, StoredVariable>,
    default_ttl: Option<u64>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expiry used when a write carries no ttl of its own
    pub fn with_default_ttl(mut self, default_ttl: Option<u64>) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries.values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_expired(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| entry.is_live(now));
    }
}

impl VariableStore for Variables {
    fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Utc::now())
    }

    fn set(&mut self, key: &str, value: Value, ttl: Option<u64>) {
        let now = Utc::now();
        self.purge_expired(now);

        // zero counts as "not given"
        let ttl = ttl.filter(|ttl| *ttl > 0).or(self.default_ttl);
        let expires_at = ttl.and_then(|ttl| {
            let seconds = ttl.min(MAX_TTL_SECS) as i64;
            now.checked_add_signed(Duration::seconds(seconds))
        });

        self.entries
            .insert(key.to_string(), StoredVariable { value, expires_at });
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn snapshot(&self) -> Params {
        let now = Utc::now();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }
}

/// Variables scoped to the current step; ttl is ignored
#[derive(Debug, Clone, Default)]
pub struct LocalVariables {
    entries: Params,
}

impl LocalVariables {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableStore for LocalVariables {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value, _ttl: Option<u64>) {
        self.entries.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn snapshot(&self) -> Params {
        self.entries.clone()
    }
}

/// Mid-dialog variables.
///
/// `update` shallow-merges two JSON objects and replaces anything else.
#[derive(Debug, Clone, Default)]
pub struct MidVariables {
    entries: Params,
}

impl MidVariables {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MidVariableStore for MidVariables {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) {
        let incoming = match value {
            Value::Object(incoming) => incoming,
            other => {
                self.entries.insert(key.to_string(), other);
                return;
            }
        };

        if let Some(Value::Object(existing)) = self.entries.get_mut(key) {
            existing.extend(incoming);
            return;
        }
        self.entries
            .insert(key.to_string(), Value::Object(incoming));
    }

    fn snapshot(&self) -> Params {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variables_set_get_delete() {
        let mut variables = Variables::new();
        variables.set("name", json!("Ada"), None);

        assert_eq!(variables.get("name"), Some(json!("Ada")));
        assert_eq!(variables.len(), 1);

        variables.delete("name");
        assert_eq!(variables.get("name"), None);

        // absent key
        variables.delete("name");
        assert!(variables.is_empty());
    }

    #[test]
    fn test_variables_expiry() {
        let mut variables = Variables::new();
        variables.set("code", json!(1234), Some(60));
        variables.set("forever", json!(true), None);

        let later = Utc::now() + Duration::seconds(120);
        assert_eq!(variables.get("code"), Some(json!(1234)));
        assert_eq!(variables.get_at("code", later), None);
        assert_eq!(variables.get_at("forever", later), Some(json!(true)));
    }

    #[test]
    fn test_variables_default_ttl() {
        let mut variables = Variables::new().with_default_ttl(Some(10));
        variables.set("a", json!(1), None);
        variables.set("b", json!(2), Some(0));
        variables.set("c", json!(3), Some(1000));

        let later = Utc::now() + Duration::seconds(30);
        assert_eq!(variables.get_at("a", later), None);
        assert_eq!(variables.get_at("b", later), None);
        assert_eq!(variables.get_at("c", later), Some(json!(3)));
    }

    #[test]
    fn test_variables_clear_and_snapshot() {
        let mut variables = Variables::new();
        variables.set("a", json!(1), None);
        variables.set("b", Value::Null, None);

        let snapshot = variables.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["b"], Value::Null);

        variables.clear();
        assert_eq!(variables.get("a"), None);
        assert_eq!(variables.get("b"), None);
        assert!(variables.snapshot().is_empty());
    }

    #[test]
    fn test_local_variables_ignore_ttl() {
        let mut local = LocalVariables::new();
        local.set("step", json!("ask_age"), Some(1));

        assert_eq!(local.get("step"), Some(json!("ask_age")));
        local.clear();
        assert!(local.snapshot().is_empty());
    }

    #[test]
    fn test_mid_variables_merge_objects() {
        let mut mid = MidVariables::new();
        mid.update("form", json!({"name": "Ada", "age": 30}));
        mid.update("form", json!({"age": 31, "city": "Oslo"}));

        assert_eq!(
            mid.get("form"),
            Some(json!({"name": "Ada", "age": 31, "city": "Oslo"}))
        );
    }

    #[test]
    fn test_mid_variables_replace_non_objects() {
        let mut mid = MidVariables::new();
        mid.update("answer", json!({"raw": "yes"}));
        mid.update("answer", json!("no"));
        assert_eq!(mid.get("answer"), Some(json!("no")));

        mid.update("answer", Value::Null);
        assert_eq!(mid.get("answer"), Some(Value::Null));
    }
}
