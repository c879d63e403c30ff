//! Error types for the value model.

use thiserror::Error;

/// Result type alias for value model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building values from external input.
#[derive(Error, Debug)]
pub enum Error {
    /// The input was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
