//! In-memory vector index using Euclidean distance.
//!
//! [`InMemoryVectorIndex`] is a zero-dependency index backed by a `Vec`
//! behind a `tokio::sync::RwLock`, suitable for development, testing, and
//! small corpora that fit in memory.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::Chunk;
use crate::error::Result;
use crate::vectorstore::VectorIndex;

/// An in-memory [`VectorIndex`] using Euclidean (L2) distance.
///
/// Search scans every stored chunk, so it is linear in corpus size. All
/// operations are async-safe via `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    chunks: RwLock<Vec<Chunk>>,
}

impl InMemoryVectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Euclidean distance between two vectors of equal dimension.
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn add(&self, new_chunks: &[Chunk]) -> Result<()> {
        let mut chunks = self.chunks.write().await;
        chunks.extend_from_slice(new_chunks);
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<(Chunk, f32)>> {
        let chunks = self.chunks.read().await;

        let mut scored: Vec<(Chunk, f32)> = chunks
            .iter()
            .map(|chunk| {
                let distance = euclidean_distance(&chunk.embedding, embedding);
                (chunk.clone(), distance)
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn reset(&self) -> Result<()> {
        let mut chunks = self.chunks.write().await;
        chunks.clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let chunks = self.chunks.read().await;
        Ok(chunks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocSource;

    fn chunk(content: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            content: content.to_string(),
            source: DocSource::unindexed("data/guide.txt", "guide.txt"),
            chunk_index: 0,
            embedding,
        }
    }

    #[tokio::test]
    async fn search_returns_closest_first() {
        let index = InMemoryVectorIndex::new();
        index
            .add(&[
                chunk("far", vec![3.0, 0.0]),
                chunk("near", vec![0.5, 0.0]),
                chunk("exact", vec![0.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = index.search(&[0.0, 0.0], 3).await.unwrap();
        let contents: Vec<&str> = results.iter().map(|(c, _)| c.content.as_str()).collect();
        assert_eq!(contents, vec!["exact", "near", "far"]);
        assert_eq!(results[0].1, 0.0);
    }

    #[tokio::test]
    async fn search_is_bounded_by_top_k() {
        let index = InMemoryVectorIndex::new();
        index
            .add(&[chunk("a", vec![1.0]), chunk("b", vec![2.0]), chunk("c", vec![3.0])])
            .await
            .unwrap();

        let results = index.search(&[0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn reset_empties_the_index() {
        let index = InMemoryVectorIndex::new();
        index.add(&[chunk("a", vec![1.0])]).await.unwrap();
        index.reset().await.unwrap();
        assert_eq!(index.len().await.unwrap(), 0);
        assert!(index.search(&[0.0], 5).await.unwrap().is_empty());
    }
}
