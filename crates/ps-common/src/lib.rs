//! Shared value model for piiscrub.
//!
//! This crate provides the data shape the sanitization engine operates on:
//! - [`Value`]: a closed tagged variant covering everything a decoded JSON
//!   payload can hold, plus host "special" types (dates, regexes, maps, sets)
//! - [`Object`]: a shared, ordered map of named fields with stable identity,
//!   so callers can build (and the engine can detect) reference cycles
//! - Lossless conversion to and from `serde_json::Value`
//!
//! # Example
//!
//! ```
//! use ps_common::{Object, Value};
//!
//! let node = Object::new();
//! node.insert("id", Value::from("123"));
//! node.insert("self", Value::Object(node.clone()));
//!
//! // Cycles render as a placeholder instead of recursing forever.
//! assert_eq!(Value::Object(node).to_string(), r#"{"id":"123","self":"[Circular]"}"#);
//! ```

pub mod error;
pub mod json;
pub mod special;
pub mod value;

pub use error::{Error, Result};
pub use json::CIRCULAR_PLACEHOLDER;
pub use special::{RegexLiteral, Special};
pub use value::{Fields, Object, ObjectId, Value};
