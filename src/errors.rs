//! Error Types
//!
//! Failure modes of the animation core. Only asset loading can fail; the
//! per-frame evaluation paths (`update`, `evaluate_layers`,
//! `get_skinning_palette`) never return errors.

use thiserror::Error;

/// The error type for animation asset loading.
#[derive(Error, Debug)]
pub enum AnimationError {
    /// The on-disk data parsed as JSON but violates the asset schema
    /// (wrong arity, bad key data, ...).
    #[error("Asset format error: {0}")]
    Format(String),

    /// JSON parsing error (malformed document or missing required keys).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
