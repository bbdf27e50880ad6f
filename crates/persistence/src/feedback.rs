//! Feedback records and store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::PersistenceError;

/// A feedback record as submitted by the feedback-capture tool.
///
/// `text` is the canonical serialization of profile + feedback that was
/// embedded; it is stored alongside the vector so records remain
/// re-embeddable if the model ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub name: String,
    pub age: u32,
    pub budget: f64,
    pub capacity: u32,
    pub car_type: String,
    pub feedback: String,
    /// Usefulness rating from 1 (bad) to 5 (excellent), when given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Call duration at save time, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl NewFeedback {
    /// Canonical text block for embedding: profile fields and feedback in a
    /// fixed order, one clause per field.
    pub fn canonical_text(
        name: &str,
        age: u32,
        budget: f64,
        capacity: u32,
        car_type: &str,
        feedback: &str,
    ) -> String {
        format!(
            "Customer {name}, age {age}, budget {budget} USD, travels with {capacity} people, \
             prefers {car_type}. Feedback: {feedback}"
        )
    }
}

/// A persisted feedback record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Store-assigned identifier
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub budget: f64,
    pub capacity: u32,
    pub car_type: String,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    pub text: String,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

/// Feedback store contract
///
/// Append-only: records are immutable once written, and `list` returns
/// them in insertion order so similarity ranking can tie-break stably.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persist a record, assigning id and timestamp.
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, PersistenceError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<FeedbackRecord>, PersistenceError>;
}

/// In-memory feedback store
///
/// Concurrent readers and append-only writers share the vector behind an
/// RwLock; there is no update or delete path.
pub struct MemoryFeedbackStore {
    dimension: usize,
    records: RwLock<Vec<FeedbackRecord>>,
}

impl MemoryFeedbackStore {
    /// Create a store enforcing the given embedding dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: RwLock::new(Vec::new()),
        }
    }

    /// The fixed embedding dimensionality this store enforces.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Is the store empty?
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, PersistenceError> {
        if feedback.embedding.len() != self.dimension {
            return Err(PersistenceError::DimensionMismatch {
                expected: self.dimension,
                actual: feedback.embedding.len(),
            });
        }

        let record = FeedbackRecord {
            id: Uuid::new_v4(),
            name: feedback.name,
            age: feedback.age,
            budget: feedback.budget,
            capacity: feedback.capacity,
            car_type: feedback.car_type,
            feedback: feedback.feedback,
            rating: feedback.rating,
            duration_seconds: feedback.duration_seconds,
            text: feedback.text,
            embedding: feedback.embedding,
            created_at: Utc::now(),
        };

        self.records.write().push(record.clone());
        tracing::debug!(id = %record.id, name = %record.name, "Feedback record stored");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<FeedbackRecord>, PersistenceError> {
        Ok(self.records.read().clone())
    }
}
