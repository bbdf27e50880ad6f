//! Text embeddings
//!
//! Embedding generation lives behind an external HTTP provider; this
//! module defines the contract, the HTTP client, and a deterministic
//! hash-based embedder for tests.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::RagError;

/// Converts free text to a fixed-length vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Fixed dimensionality of produced vectors.
    fn dimension(&self) -> usize;
}

/// Embedding endpoint response body
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// HTTP embedding provider
///
/// Sends `{model, input}` to the configured endpoint and expects the
/// vector under `data[0].embedding`.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl HttpEmbeddingProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            dimension,
        }
    }

    fn parse_response(&self, body: EmbeddingResponse) -> Result<Vec<f32>, RagError> {
        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RagError::Embedding("response carried no embedding".to_string()))?;

        if embedding.len() != self.dimension {
            return Err(RagError::Embedding(format!(
                "provider returned {}-dimensional vector, expected {}",
                embedding.len(),
                self.dimension
            )));
        }

        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RagError::Embedding(format!(
                "embedding endpoint returned {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        self.parse_response(body)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Deterministic embedder for tests (no network required)
///
/// Spreads character codes over the vector and normalizes, so equal texts
/// embed identically and similar texts land near each other.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % self.dimension;
            embedding[idx] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        Ok(self.embed_text(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
