//! Fuzz target for sanitizing arbitrary JSON payloads.
//!
//! Sanitization must never panic, must leave no sensitive key behind and
//! must be a no-op the second time round.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ps_common::Value;
use ps_redact::{field_is_sensitive, sanitize, sanitize_json};
use serde_json::Value as JsonValue;

fn has_sensitive_key(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(map) => map
            .iter()
            .any(|(k, v)| field_is_sensitive(k).is_some() || has_sensitive_key(v)),
        JsonValue::Array(items) => items.iter().any(has_sensitive_key),
        _ => false,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(json) = serde_json::from_slice::<JsonValue>(data) else {
        return;
    };

    let value = Value::from(&json);
    let once = sanitize(&value);
    let twice = sanitize(&once);
    assert!(twice.ptr_eq(&once));

    let rendered = once.to_json();
    assert!(!has_sensitive_key(&rendered));
    assert_eq!(sanitize_json(&json), rendered);
});
