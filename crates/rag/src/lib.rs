//! Feedback similarity retrieval
//!
//! Converts free text to embeddings through an external provider and
//! answers "most similar feedback to X" with a cosine scan over the whole
//! store. There is no index; ranking is exact and insertion-order stable.

pub mod embeddings;
pub mod search;
pub mod similarity;

pub use embeddings::{EmbeddingProvider, HashEmbedder, HttpEmbeddingProvider};
pub use search::{FeedbackSearch, ScoredFeedback, TOP_K};
pub use similarity::cosine_similarity;

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Similarity is undefined for this input (zero vector, length
    /// mismatch). Reported as a failure, never as a silent 0 or NaN score.
    #[error("Similarity undefined: {0}")]
    Similarity(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<RagError> for voice_sales_core::Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Similarity(msg) => voice_sales_core::Error::Retrieval(msg),
            other => voice_sales_core::Error::Retrieval(other.to_string()),
        }
    }
}

impl From<voice_sales_persistence::PersistenceError> for RagError {
    fn from(err: voice_sales_persistence::PersistenceError) -> Self {
        RagError::Store(err.to_string())
    }
}
