//! Embedded-chunk snapshots: the persisted form of the vector index.
//!
//! `populate` writes every embedded chunk to a JSON file; `query`, `serve`,
//! and `eval` load it back into the in-memory index at startup. Embeddings
//! in a snapshot are only valid for the model that produced them.

use std::path::Path;

use anyhow::Context;
use nourai_rag::Chunk;
use tracing::info;

/// Write embedded chunks to `path`, creating parent directories as needed.
pub fn save(path: &Path, chunks: &[Chunk]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating snapshot directory {}", parent.display()))?;
    }
    let json = serde_json::to_string(chunks).context("serializing index snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing index snapshot {}", path.display()))?;
    info!(count = chunks.len(), path = %path.display(), "wrote index snapshot");
    Ok(())
}

/// Load embedded chunks from `path`.
pub fn load(path: &Path) -> anyhow::Result<Vec<Chunk>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading index snapshot {}", path.display()))?;
    let chunks: Vec<Chunk> =
        serde_json::from_str(&text).context("parsing index snapshot")?;
    info!(count = chunks.len(), path = %path.display(), "loaded index snapshot");
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nourai_rag::DocSource;

    #[test]
    fn snapshot_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("index.json");

        let chunks = vec![Chunk {
            content: "Texto embebido.".to_string(),
            source: DocSource::unindexed("data/guia.txt", "guia.txt"),
            chunk_index: 0,
            embedding: vec![0.1, 0.2, 0.3],
        }];

        save(&path, &chunks).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, chunks);
    }
}
