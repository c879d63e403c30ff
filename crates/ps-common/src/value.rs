//! The tagged value model.
//!
//! Containers are reference counted. Cloning a [`Value`] never deep-copies an
//! array, object, map or set; it hands out another reference to the same
//! allocation. That is what lets the sanitizer return the caller's own value
//! when nothing needed removing, and what gives objects a stable identity for
//! cycle detection.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde_json::Number;

use crate::special::Special;

/// Ordered list of named fields held by an [`Object`].
pub type Fields = Vec<(String, Value)>;

/// A structured value as produced by decoding a JSON-like payload.
///
/// Equality is structural. Comparing two distinct cyclic graphs does not
/// terminate; compare those with [`Value::ptr_eq`] instead.
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Immutable shared sequence.
    Array(Arc<Vec<Value>>),
    /// Shared map of named fields (the only container the sanitizer edits).
    Object(Object),
    /// Atomic host value that is never decomposed into fields.
    Special(Special),
}

impl Value {
    /// Build an object value from `(name, value)` pairs.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Object::from_fields(fields))
    }

    /// Build an array value.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    /// Identity comparison.
    ///
    /// Containers (arrays, objects, maps, sets, regexes) compare by
    /// allocation. Scalars carry no identity and compare by value.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Special(a), Value::Special(b)) => a.ptr_eq(b),
            (Value::Array(_) | Value::Object(_) | Value::Special(_), _)
            | (_, Value::Array(_) | Value::Object(_) | Value::Special(_)) => false,
            (a, b) => a == b,
        }
    }

    /// Short lowercase name of the variant, for diagnostics.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Special(special) => special.type_tag(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_special(&self) -> Option<&Special> {
        match self {
            Value::Special(special) => Some(special),
            _ => None,
        }
    }

    /// Look up a field when this value is an object.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }
}

// Debug must not recurse into objects: a cyclic graph would never finish.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(obj) => fmt::Debug::fmt(obj, f),
            Value::Special(special) => fmt::Debug::fmt(special, f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Special> for Value {
    fn from(special: Special) -> Self {
        Value::Special(special)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Special(Special::Date(date))
    }
}

/// Stable identity of an [`Object`] allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// Shared, ordered map of named fields.
///
/// Cloning an `Object` yields another handle to the same fields, so an
/// object can be inserted into itself (directly or through descendants).
/// Mutation goes through `&self`; fields are guarded by a reader-writer lock
/// so values can be shared across threads.
#[derive(Clone, Default)]
pub struct Object(Arc<RwLock<Fields>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an object from `(name, value)` pairs. Later duplicates replace
    /// earlier ones in place, keeping the first position.
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let obj = Object::new();
        {
            let mut guard = obj.write();
            for (key, value) in fields {
                upsert(&mut guard, key.into(), value);
            }
        }
        obj
    }

    /// Identity of the underlying allocation.
    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Read access to the fields.
    ///
    /// A lock poisoned by a panicking writer elsewhere is still readable; the
    /// fields themselves are always in a consistent state between calls.
    pub fn read(&self) -> RwLockReadGuard<'_, Fields> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Fields> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        upsert(&mut self.write(), key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut fields = self.write();
        let idx = fields.iter().position(|(k, _)| k == key)?;
        Some(fields.remove(idx).1)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.read().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

fn upsert(fields: &mut Fields, key: String, value: Value) -> Option<Value> {
    match fields.iter_mut().find(|(k, _)| *k == key) {
        Some((_, slot)) => Some(std::mem::replace(slot, value)),
        None => {
            fields.push((key, value));
            None
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.read() == *other.read()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id())
            .field("keys", &self.keys())
            .finish()
    }
}
