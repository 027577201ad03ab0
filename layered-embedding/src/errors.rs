//! Error types for embedding lookups and table IO.

use thiserror::Error;

/// Errors that can occur while reading or querying an embedding table.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// A token has no vector in the table.
    #[error("no embedding for token '{token}'")]
    Missing { token: String },

    /// A vector does not have the table's dimension.
    #[error("expected a vector of dimension {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A line of a word2vec text file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Reading or writing a table failed.
    #[error("embedding table io: {0}")]
    Io(#[from] std::io::Error),

    /// A saved table could not be (de)serialized.
    #[error("embedding table serialization: {message}")]
    Serialize { message: String },
}

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
