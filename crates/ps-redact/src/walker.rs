//! Depth-first traversal that drops sensitive fields.
//!
//! Every walk returns `None` when the subtree is unchanged and `Some(new)`
//! when something below it was removed or a cycle was cut. Unchanged
//! subtrees are never copied, so callers get their own references back.

use std::collections::HashSet;
use std::sync::Arc;

use ps_common::{Fields, Object, ObjectId, Value, CIRCULAR_PLACEHOLDER};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::registry::{PatternRegistry, PiiPattern};

/// Per-call traversal state.
///
/// `visited` holds the objects on the current path only: an identity is
/// inserted on entry and removed on exit, so a subtree shared by two siblings
/// is walked twice rather than reported as circular.
#[derive(Debug, Default)]
pub struct SanitizeContext {
    visited: HashSet<ObjectId>,
    pub fields_removed: usize,
    pub cycles_broken: usize,
    /// Distinct matched tokens in first-seen order.
    pub matched_patterns: Vec<&'static str>,
}

impl SanitizeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when `id` is already an ancestor.
    fn enter(&mut self, id: ObjectId) -> bool {
        self.visited.insert(id)
    }

    fn leave(&mut self, id: ObjectId) {
        self.visited.remove(&id);
    }

    fn record_removal(&mut self, field: &str, pattern: &PiiPattern) {
        self.fields_removed += 1;
        if !self.matched_patterns.contains(&pattern.text) {
            self.matched_patterns.push(pattern.text);
        }
        trace!(
            field = %field,
            pattern = pattern.text,
            category = %pattern.category,
            "dropping sensitive field"
        );
    }
}

/// Structural walker bound to a pattern registry.
pub struct Walker<'r> {
    registry: &'r PatternRegistry,
    context: SanitizeContext,
}

impl<'r> Walker<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self {
            registry,
            context: SanitizeContext::new(),
        }
    }

    pub fn context(&self) -> &SanitizeContext {
        &self.context
    }

    pub fn into_context(self) -> SanitizeContext {
        self.context
    }

    /// Walk a value. `None` means unchanged.
    pub fn walk(&mut self, value: &Value) -> Option<Value> {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
            Value::Special(_) => None,
            Value::Array(items) => self.walk_array(items),
            Value::Object(obj) => self.walk_object(obj),
        }
    }

    fn walk_array(&mut self, items: &Arc<Vec<Value>>) -> Option<Value> {
        let mut rebuilt: Option<Vec<Value>> = None;

        for (idx, item) in items.iter().enumerate() {
            match self.walk(item) {
                Some(walked) => rebuilt
                    .get_or_insert_with(|| items[..idx].to_vec())
                    .push(walked),
                None => {
                    if let Some(out) = rebuilt.as_mut() {
                        out.push(item.clone());
                    }
                }
            }
        }

        rebuilt.map(Value::from)
    }

    fn walk_object(&mut self, obj: &Object) -> Option<Value> {
        let id = obj.id();
        if !self.context.enter(id) {
            self.context.cycles_broken += 1;
            trace!("breaking reference cycle");
            return Some(Value::String(CIRCULAR_PLACEHOLDER.to_string()));
        }

        let walked = {
            let fields = obj.read();
            self.walk_fields(&fields)
        };

        self.context.leave(id);
        walked
    }

    fn walk_fields(&mut self, fields: &Fields) -> Option<Value> {
        let mut kept: Option<Fields> = None;

        for (idx, (key, value)) in fields.iter().enumerate() {
            if let Some(pattern) = self.registry.find_match(key) {
                self.context.record_removal(key, pattern);
                kept.get_or_insert_with(|| fields[..idx].to_vec());
                continue;
            }

            match self.walk(value) {
                Some(walked) => kept
                    .get_or_insert_with(|| fields[..idx].to_vec())
                    .push((key.clone(), walked)),
                None => {
                    if let Some(out) = kept.as_mut() {
                        out.push((key.clone(), value.clone()));
                    }
                }
            }
        }

        kept.map(|fields| Value::Object(Object::from_fields(fields)))
    }

    /// Walk a plain JSON tree. Same field decisions; no cycles are possible.
    pub fn walk_json(&mut self, value: &JsonValue) -> Option<JsonValue> {
        match value {
            JsonValue::Array(items) => {
                let mut rebuilt: Option<Vec<JsonValue>> = None;
                for (idx, item) in items.iter().enumerate() {
                    match self.walk_json(item) {
                        Some(walked) => rebuilt
                            .get_or_insert_with(|| items[..idx].to_vec())
                            .push(walked),
                        None => {
                            if let Some(out) = rebuilt.as_mut() {
                                out.push(item.clone());
                            }
                        }
                    }
                }
                rebuilt.map(JsonValue::Array)
            }
            JsonValue::Object(map) => {
                let mut kept: Option<serde_json::Map<String, JsonValue>> = None;
                for (idx, (key, item)) in map.iter().enumerate() {
                    if let Some(pattern) = self.registry.find_match(key) {
                        self.context.record_removal(key, pattern);
                        kept.get_or_insert_with(|| prefix(map, idx));
                        continue;
                    }
                    match self.walk_json(item) {
                        Some(walked) => {
                            kept.get_or_insert_with(|| prefix(map, idx))
                                .insert(key.clone(), walked);
                        }
                        None => {
                            if let Some(out) = kept.as_mut() {
                                out.insert(key.clone(), item.clone());
                            }
                        }
                    }
                }
                kept.map(JsonValue::Object)
            }
            _ => None,
        }
    }
}

fn prefix(map: &serde_json::Map<String, JsonValue>, len: usize) -> serde_json::Map<String, JsonValue> {
    map.iter()
        .take(len)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
