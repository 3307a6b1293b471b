//! Error types for sd-core

use thiserror::Error;

/// Core error type for sqldeps
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: A dependency cache file is missing
    #[error("[C003] Cache file not found: {path}. Run `sqldeps discover` first")]
    CacheNotFound { path: String },

    /// C004: A dependency cache file could not be decoded
    #[error("[C004] Failed to parse cache file '{path}': {source}")]
    CacheParse {
        path: String,
        source: serde_json::Error,
    },

    /// C005: IO error with file path context
    #[error("[C005] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C006: IO error
    #[error("[C006] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C007: YAML parse error
    #[error("[C007] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
