//! Error types for sd-resolve

use sd_core::CoreError;
use thiserror::Error;

/// Resolution errors
///
/// Missing metadata for an individual dependency is never an error; these
/// cover the cases where resolution cannot start or its result cannot be
/// persisted.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// R001: Cache could not be read or decoded
    #[error("[R001] {0}")]
    Core(#[from] CoreError),

    /// R002: Routine is in neither cache
    #[error("[R002] Routine '{name}' not found in the dependency cache")]
    UnknownRoutine { name: String },

    /// R003: Dependency tree could not be written
    #[error("[R003] Failed to write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    /// R004: Dependency tree could not be serialized
    #[error("[R004] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for ResolveError
pub type ResolveResult<T> = Result<T, ResolveError>;
