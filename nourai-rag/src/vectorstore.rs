//! Vector index trait wrapping a nearest-neighbor store.

use async_trait::async_trait;

use crate::document::Chunk;
use crate::error::Result;

/// A persistent nearest-neighbor store over embedded chunks.
///
/// Distances are non-negative and smaller-is-closer, so the derived
/// similarity `1 / (1 + distance)` maps distance 0 to 1.0. The store must
/// tolerate concurrent reads; the pipeline performs no read-side locking of
/// its own.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add embedded chunks to the index. Chunks must have embeddings set.
    async fn add(&self, chunks: &[Chunk]) -> Result<()>;

    /// Return the `top_k` nearest chunks to `embedding`, closest first,
    /// each paired with its raw distance.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<(Chunk, f32)>>;

    /// Remove every stored chunk. The only supported form of deletion.
    async fn reset(&self) -> Result<()>;

    /// Number of chunks currently stored.
    async fn len(&self) -> Result<usize>;
}
