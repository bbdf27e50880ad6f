//! Top-K feedback retrieval

use std::sync::Arc;

use voice_sales_persistence::{FeedbackRecord, FeedbackStore};

use crate::embeddings::EmbeddingProvider;
use crate::similarity::cosine_similarity;
use crate::RagError;

/// Number of matches returned to the conversation.
pub const TOP_K: usize = 3;

/// A record with its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredFeedback {
    pub record: FeedbackRecord,
    pub similarity: f32,
}

impl ScoredFeedback {
    /// Score as shown to users. Ranking always uses full precision.
    pub fn display_score(&self) -> String {
        format!("{:.3}", self.similarity)
    }
}

/// Similarity retrieval over the feedback store.
///
/// Embeds the query, scans every stored record, and returns the top K by
/// cosine similarity. The sort is stable and the store lists records in
/// insertion order, so exact ties rank earlier records first.
pub struct FeedbackSearch {
    store: Arc<dyn FeedbackStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl FeedbackSearch {
    pub fn new(store: Arc<dyn FeedbackStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Most similar records to the query text, best first.
    ///
    /// Returns an empty vector for an empty store. A record whose
    /// similarity is undefined against the query fails the whole retrieval;
    /// the caller reports that as "no matches" rather than ranking a
    /// partial result.
    pub async fn find_similar(&self, query: &str, k: usize) -> Result<Vec<ScoredFeedback>, RagError> {
        let records = self.store.list().await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let mut scored = Vec::with_capacity(records.len());
        for record in records {
            let similarity = cosine_similarity(&query_embedding, &record.embedding)?;
            scored.push(ScoredFeedback { record, similarity });
        }

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        tracing::debug!(returned = scored.len(), "Feedback similarity scan complete");
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use voice_sales_persistence::{MemoryFeedbackStore, NewFeedback};

    /// Embedder that returns a fixed vector regardless of input, letting
    /// tests pin exact similarity scores through the stored embeddings.
    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
            Ok(self.0.clone())
        }

        fn dimension(&self) -> usize {
            self.0.len()
        }
    }

    fn feedback(name: &str, embedding: Vec<f32>) -> NewFeedback {
        NewFeedback {
            name: name.to_string(),
            age: 30,
            budget: 25_000.0,
            capacity: 4,
            car_type: "SUV".to_string(),
            feedback: format!("{name} feedback"),
            rating: None,
            duration_seconds: None,
            text: format!("{name} text"),
            embedding,
        }
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty() {
        let store = Arc::new(MemoryFeedbackStore::new(2));
        let search = FeedbackSearch::new(store, Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let results = search.find_similar("anything", TOP_K).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_ranking_descending_with_stable_ties() {
        let store = Arc::new(MemoryFeedbackStore::new(2));
        // Query axis is (1, 0). A and B score identically; C scores lower.
        let a = vec![0.92, (1.0f32 - 0.92 * 0.92).sqrt()];
        let b = a.clone();
        let c = vec![0.40, (1.0f32 - 0.40 * 0.40).sqrt()];
        store.insert(feedback("A", a)).await.unwrap();
        store.insert(feedback("B", b)).await.unwrap();
        store.insert(feedback("C", c)).await.unwrap();

        let search = FeedbackSearch::new(store, Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let results = search.find_similar("query", TOP_K).await.unwrap();

        let names: Vec<_> = results.iter().map(|s| s.record.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!((results[0].similarity - 0.92).abs() < 1e-4);
        assert!((results[2].similarity - 0.40).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_returns_min_k_n() {
        let store = Arc::new(MemoryFeedbackStore::new(2));
        for i in 0..5 {
            let x = 0.1 * (i as f32 + 1.0);
            store
                .insert(feedback(&format!("r{i}"), vec![x, 1.0]))
                .await
                .unwrap();
        }

        let search = FeedbackSearch::new(store, Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let results = search.find_similar("query", TOP_K).await.unwrap();
        assert_eq!(results.len(), 3);
        // Best match is the vector leaning most toward the query axis.
        assert_eq!(results[0].record.name, "r4");
    }

    #[tokio::test]
    async fn test_zero_query_vector_fails_retrieval() {
        let store = Arc::new(MemoryFeedbackStore::new(2));
        store.insert(feedback("A", vec![1.0, 0.0])).await.unwrap();

        let search = FeedbackSearch::new(store, Arc::new(FixedEmbedder(vec![0.0, 0.0])));
        let err = search.find_similar("query", TOP_K).await.unwrap_err();
        assert!(matches!(err, RagError::Similarity(_)));
    }

    #[test]
    fn test_display_score_rounding() {
        let scored = ScoredFeedback {
            record: dummy_record(),
            similarity: 0.91949,
        };
        assert_eq!(scored.display_score(), "0.919");
    }

    fn dummy_record() -> FeedbackRecord {
        FeedbackRecord {
            id: uuid::Uuid::nil(),
            name: "x".into(),
            age: 1,
            budget: 0.0,
            capacity: 1,
            car_type: "SUV".into(),
            feedback: String::new(),
            rating: None,
            duration_seconds: None,
            text: String::new(),
            embedding: vec![1.0],
            created_at: chrono::Utc::now(),
        }
    }
}
