//! Feedback persistence for the voice sales agent
//!
//! Feedback records are written once through the feedback-capture tool and
//! read back only by full-scan similarity queries. The store contract is
//! append and list, nothing else.

pub mod error;
pub mod feedback;

pub use error::PersistenceError;
pub use feedback::{FeedbackRecord, FeedbackStore, MemoryFeedbackStore, NewFeedback};

impl From<PersistenceError> for voice_sales_core::Error {
    fn from(err: PersistenceError) -> Self {
        voice_sales_core::Error::Persistence(err.to_string())
    }
}
