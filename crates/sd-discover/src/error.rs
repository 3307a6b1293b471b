//! Error types for sd-discover

use sd_core::CoreError;
use sd_db::DbError;
use thiserror::Error;

/// Discovery and extraction errors
#[derive(Error, Debug)]
pub enum DiscoverError {
    /// Catalog query failed (X001)
    #[error("[X001] Catalog query failed: {0}")]
    Catalog(#[from] DbError),

    /// Cache or config error (X002)
    #[error("[X002] {0}")]
    Core(#[from] CoreError),

    /// Output file could not be written (X003)
    #[error("[X003] Failed to write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for DiscoverError
pub type DiscoverResult<T> = Result<T, DiscoverError>;
