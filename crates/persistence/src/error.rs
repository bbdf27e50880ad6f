//! Persistence error types

use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// An insert carried an embedding whose length does not match the
    /// store's fixed dimensionality. Such a record would poison every
    /// similarity comparison, so it is rejected at write time.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
