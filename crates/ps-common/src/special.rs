//! Host runtime types that are atomic to the sanitizer.
//!
//! These show up in in-memory error objects before serialization. They are
//! recognized by tag and passed through untouched; the engine never treats
//! them as field containers.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::value::Value;

/// A special (non-decomposable) value.
#[derive(Clone, PartialEq)]
pub enum Special {
    /// Point in time.
    Date(DateTime<Utc>),
    /// Regular expression literal.
    Regex(Arc<RegexLiteral>),
    /// Keyed collection whose keys are arbitrary values.
    Map(Arc<Vec<(Value, Value)>>),
    /// Collection of distinct values.
    Set(Arc<Vec<Value>>),
    /// Any other runtime object, identified only by its type name.
    Opaque(Arc<str>),
}

impl Special {
    pub fn regex(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Special::Regex(Arc::new(RegexLiteral {
            source: source.into(),
            flags: flags.into(),
        }))
    }

    pub fn map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Self {
        Special::Map(Arc::new(entries.into_iter().collect()))
    }

    /// Build a set, dropping later duplicates.
    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Special::Set(Arc::new(unique))
    }

    pub fn opaque(type_name: &str) -> Self {
        Special::Opaque(Arc::from(type_name))
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Special::Date(_) => "date",
            Special::Regex(_) => "regex",
            Special::Map(_) => "map",
            Special::Set(_) => "set",
            Special::Opaque(_) => "opaque",
        }
    }

    /// Identity comparison; dates have no allocation and compare by value.
    pub fn ptr_eq(&self, other: &Special) -> bool {
        match (self, other) {
            (Special::Date(a), Special::Date(b)) => a == b,
            (Special::Regex(a), Special::Regex(b)) => Arc::ptr_eq(a, b),
            (Special::Map(a), Special::Map(b)) => Arc::ptr_eq(a, b),
            (Special::Set(a), Special::Set(b)) => Arc::ptr_eq(a, b),
            (Special::Opaque(a), Special::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Special::Date(date) => write!(f, "Date({})", date.to_rfc3339()),
            Special::Regex(re) => write!(f, "Regex({})", re),
            Special::Map(entries) => write!(f, "Map(len={})", entries.len()),
            Special::Set(items) => write!(f, "Set(len={})", items.len()),
            Special::Opaque(name) => write!(f, "Opaque({})", name),
        }
    }
}

/// Source and flags of a regular expression literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexLiteral {
    pub source: String,
    pub flags: String,
}

impl fmt::Display for RegexLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
