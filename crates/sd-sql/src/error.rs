//! Error types for sd-sql

use thiserror::Error;

/// SQL text processing errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error: {0}")]
    ParseError(String),

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Tokenizer error (S003)
    #[error("[S003] SQL tokenize error: {0}")]
    TokenizeError(String),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
