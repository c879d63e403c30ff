//! Field-name based sanitization for logs, telemetry and error traces.
//!
//! Given any structured value, this crate removes every object field whose
//! *name* marks it as personal data or an authentication secret, and returns
//! a value that is safe to persist or ship.
//!
//! # Key Features
//!
//! - **Word-boundary matching**: `userName` and `user_name` are removed,
//!   `filename` is kept.
//! - **Secrets first**: authentication-secret patterns are checked before
//!   general PII, so `tokenId` is always treated as a credential.
//! - **Scoped short tokens**: `ip` only matches an explicit list of field names
//!   (`ipAddress`, `clientIp`, ...), never `zip` or `ship`.
//! - **Structural sharing**: unchanged input comes back as the same reference.
//! - **Cycle safe**: a reference back to an ancestor becomes `"[Circular]"`.
//! - **Total**: never fails and never panics; unknown host types pass through.
//!
//! # Example
//!
//! ```
//! use ps_common::Value;
//! use ps_redact::sanitize;
//!
//! let payload = Value::from_json_str(
//!     r#"{"username":"john.doe","password":"secret123","id":"123"}"#,
//! ).unwrap();
//!
//! let clean = sanitize(&payload);
//! assert_eq!(clean.to_string(), r#"{"username":"john.doe","id":"123"}"#);
//! ```

pub mod category;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod registry;
pub mod walker;

pub use category::PiiCategory;
pub use engine::{sanitize, sanitize_json, sanitize_with_outcome, SanitizeOutcome, Sanitizer};
pub use error::{RedactionError, Result};
pub use matcher::{field_is_sensitive, matches};
pub use registry::{all_patterns, MatchStrategy, PatternRegistry, PiiPattern};
pub use walker::{SanitizeContext, Walker};
