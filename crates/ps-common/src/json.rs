//! Conversion between [`Value`] and `serde_json`.
//!
//! Converting *into* the model is lossless. Converting *out* flattens special
//! types into their natural JSON rendering and replaces any edge that closes
//! a cycle with [`CIRCULAR_PLACEHOLDER`].

use std::fmt;

use chrono::SecondsFormat;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::special::Special;
use crate::value::{ObjectId, Value};
use crate::Result;

/// Literal that stands in for a reference back to an ancestor object.
pub const CIRCULAR_PLACEHOLDER: &str = "[Circular]";

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::array(items.into_iter().map(Value::from)),
            JsonValue::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        Value::from(json.clone())
    }
}

impl Value {
    /// Parse a JSON document into a value.
    pub fn from_json_str(input: &str) -> Result<Value> {
        let parsed: JsonValue = serde_json::from_str(input)?;
        Ok(parsed.into())
    }

    /// Render as plain JSON.
    ///
    /// Dates become RFC 3339 strings with millisecond precision, regexes
    /// become `/source/flags`, maps become arrays of `[key, value]` pairs,
    /// sets become arrays and opaque values become `[TypeName]`.
    pub fn to_json(&self) -> JsonValue {
        let mut path = Vec::new();
        render(self, &mut path)
    }
}

fn render(value: &Value, path: &mut Vec<ObjectId>) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::Number(n.clone()),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => JsonValue::Array(items.iter().map(|v| render(v, path)).collect()),
        Value::Object(obj) => {
            let id = obj.id();
            if path.contains(&id) {
                return JsonValue::String(CIRCULAR_PLACEHOLDER.to_string());
            }
            path.push(id);
            let map = obj
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), render(v, path)))
                .collect();
            path.pop();
            JsonValue::Object(map)
        }
        Value::Special(special) => render_special(special, path),
    }
}

fn render_special(special: &Special, path: &mut Vec<ObjectId>) -> JsonValue {
    match special {
        Special::Date(date) => JsonValue::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        Special::Regex(re) => JsonValue::String(re.to_string()),
        Special::Map(entries) => JsonValue::Array(
            entries
                .iter()
                .map(|(k, v)| JsonValue::Array(vec![render(k, path), render(v, path)]))
                .collect(),
        ),
        Special::Set(items) => JsonValue::Array(items.iter().map(|v| render(v, path)).collect()),
        Special::Opaque(name) => JsonValue::String(format!("[{}]", name)),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Value::from)
    }
}
