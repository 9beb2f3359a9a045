//! Embedding provider trait for mapping text to vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that maps text to fixed-length numeric vectors.
///
/// The same model (and model version) must serve both ingestion and query
/// time — a mismatch silently degrades retrieval rather than failing, so the
/// process constructs exactly one provider and shares it (`Arc`) between the
/// ingestion path and the query path.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends with native
/// batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}
