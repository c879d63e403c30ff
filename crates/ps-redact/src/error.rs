//! Error types for the redaction engine.
//!
//! Sanitization itself is total and never returns an error. These variants
//! describe a malformed pattern registry, which is a programmer error caught
//! by [`PatternRegistry::validate`](crate::PatternRegistry::validate).

use thiserror::Error;

use crate::PiiCategory;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Registry invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedactionError {
    /// Category and priority disagree (secrets must be 0, everything else 1).
    #[error("pattern '{pattern}' in category {category} has priority {priority}, expected {expected}")]
    PriorityMismatch {
        pattern: String,
        category: PiiCategory,
        priority: u8,
        expected: u8,
    },

    /// Patterns are not ordered by ascending priority.
    #[error("pattern '{pattern}' (priority {priority}) follows a lower-priority pattern")]
    UnsortedRegistry { pattern: String, priority: u8 },

    /// Token is empty or not lowercase.
    #[error("invalid pattern token '{0}': must be non-empty and lowercase")]
    InvalidToken(String),

    /// The same token is registered twice.
    #[error("duplicate pattern token '{0}'")]
    DuplicateToken(String),

    /// A scoped compound pattern has nothing it may match.
    #[error("pattern '{0}' uses specific-compound matching but lists no compounds")]
    MissingCompounds(String),
}
