//! Sanitization entry points.
//!
//! The [`Sanitizer`] owns nothing but a reference to the (immutable) pattern
//! registry; each call builds a fresh [`SanitizeContext`], walks the value and
//! throws the context away. When nothing matched, the caller's own value is
//! handed back (another reference to the same allocation, not a copy).

use ps_common::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::registry::{PatternRegistry, PiiPattern};
use crate::walker::{SanitizeContext, Walker};

/// Audit record describing what a sanitize call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeOutcome {
    /// Whether the returned value differs from the input.
    pub did_sanitize: bool,
    /// Number of fields dropped anywhere in the tree.
    pub fields_removed: usize,
    /// Distinct pattern tokens that caused removals, in first-seen order.
    pub matched_patterns: Vec<String>,
}

impl SanitizeOutcome {
    fn from_context(context: &SanitizeContext, changed: bool) -> Self {
        Self {
            did_sanitize: changed,
            fields_removed: context.fields_removed,
            matched_patterns: context
                .matched_patterns
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Field-name based sanitizer.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'r> {
    registry: &'r PatternRegistry,
}

impl Sanitizer<'static> {
    /// Sanitizer over the built-in pattern registry.
    pub fn new() -> Self {
        Self {
            registry: PatternRegistry::global(),
        }
    }
}

impl Default for Sanitizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Sanitizer<'r> {
    pub fn registry(&self) -> &'r PatternRegistry {
        self.registry
    }

    /// Remove every sensitive field from `value`.
    pub fn sanitize(&self, value: &Value) -> Value {
        self.sanitize_with_outcome(value).0
    }

    /// Remove every sensitive field and report what was removed.
    pub fn sanitize_with_outcome(&self, value: &Value) -> (Value, SanitizeOutcome) {
        let mut walker = Walker::new(self.registry);
        let walked = walker.walk(value);
        let context = walker.into_context();

        let outcome = SanitizeOutcome::from_context(&context, walked.is_some());
        if outcome.did_sanitize {
            debug!(
                fields_removed = outcome.fields_removed,
                cycles_broken = context.cycles_broken,
                patterns = ?outcome.matched_patterns,
                "sanitized value"
            );
        }

        (walked.unwrap_or_else(|| value.clone()), outcome)
    }

    /// Same field decisions applied to a plain `serde_json` tree.
    pub fn sanitize_json(&self, value: &JsonValue) -> JsonValue {
        self.sanitize_json_with_outcome(value).0
    }

    pub fn sanitize_json_with_outcome(&self, value: &JsonValue) -> (JsonValue, SanitizeOutcome) {
        let mut walker = Walker::new(self.registry);
        let walked = walker.walk_json(value);
        let context = walker.into_context();

        let outcome = SanitizeOutcome::from_context(&context, walked.is_some());
        if outcome.did_sanitize {
            debug!(
                fields_removed = outcome.fields_removed,
                patterns = ?outcome.matched_patterns,
                "sanitized json value"
            );
        }

        (walked.unwrap_or_else(|| value.clone()), outcome)
    }

    /// First pattern that flags `field_name`, if any.
    pub fn field_is_sensitive(&self, field_name: &str) -> Option<&'r PiiPattern> {
        self.registry.find_match(field_name)
    }
}

/// Remove every sensitive field from `value` using the built-in patterns.
///
/// Returns another reference to `value` itself when nothing was removed.
pub fn sanitize(value: &Value) -> Value {
    Sanitizer::new().sanitize(value)
}

/// Like [`sanitize`], also returning an audit record.
pub fn sanitize_with_outcome(value: &Value) -> (Value, SanitizeOutcome) {
    Sanitizer::new().sanitize_with_outcome(value)
}

/// Like [`sanitize`], for callers holding a `serde_json::Value`.
pub fn sanitize_json(value: &JsonValue) -> JsonValue {
    Sanitizer::new().sanitize_json(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_common::Object;
    use serde_json::json;

    #[test]
    fn test_nothing_to_remove_returns_same_reference() {
        let value = Value::object([
            ("id", Value::from("123")),
            ("filename", Value::from("report.csv")),
            ("amount", Value::from(100)),
        ]);
        let (out, outcome) = sanitize_with_outcome(&value);

        assert!(out.ptr_eq(&value));
        assert_eq!(outcome, SanitizeOutcome::default());
    }

    #[test]
    fn test_removes_password() {
        let value = Value::object([
            ("username", Value::from("john.doe")),
            ("password", Value::from("secret123")),
            ("id", Value::from("123")),
        ]);
        let (out, outcome) = sanitize_with_outcome(&value);

        assert_eq!(out.to_json(), json!({"username": "john.doe", "id": "123"}));
        assert!(!out.ptr_eq(&value));
        assert!(outcome.did_sanitize);
        assert_eq!(outcome.fields_removed, 1);
        assert_eq!(outcome.matched_patterns, vec!["password".to_string()]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let obj = Object::from_fields([("token", Value::from("t")), ("id", Value::from(1))]);
        let out = sanitize(&Value::Object(obj.clone()));

        assert_eq!(out.to_json(), json!({"id": 1}));
        assert_eq!(obj.keys(), vec!["token".to_string(), "id".to_string()]);
    }

    #[test]
    fn test_cycle_only_counts_as_sanitized() {
        let obj = Object::new();
        obj.insert("id", Value::from("123"));
        obj.insert("self", Value::Object(obj.clone()));

        let (out, outcome) = sanitize_with_outcome(&Value::Object(obj.clone()));
        assert_eq!(out.to_json(), json!({"id": "123", "self": "[Circular]"}));
        assert!(outcome.did_sanitize);
        assert_eq!(outcome.fields_removed, 0);

        obj.remove("self");
    }

    #[test]
    fn test_outcome_wire_format() {
        let outcome = SanitizeOutcome {
            did_sanitize: true,
            fields_removed: 2,
            matched_patterns: vec!["email".to_string(), "phone".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"didSanitize": true, "fieldsRemoved": 2, "matchedPatterns": ["email", "phone"]})
        );
    }

    #[test]
    fn test_sanitize_json_matches_value_path() {
        let input = json!({
            "id": "123",
            "zip": "12345",
            "shipmentId": "SHIP_001",
            "ipAddress": "192.168.1.1"
        });

        let via_json = sanitize_json(&input);
        let via_value = sanitize(&Value::from(&input)).to_json();

        assert_eq!(via_json, json!({"id": "123", "zip": "12345", "shipmentId": "SHIP_001"}));
        assert_eq!(via_json, via_value);
    }

    #[test]
    fn test_field_is_sensitive_through_sanitizer() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.field_is_sensitive("clientIp").map(|p| p.text), Some("ip"));
        assert!(sanitizer.field_is_sensitive("tip").is_none());
        assert_eq!(sanitizer.registry().len(), 40);
    }
}
