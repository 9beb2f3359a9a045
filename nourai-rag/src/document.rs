//! Data types for source documents, chunks, and scored retrieval results.

use serde::{Deserialize, Serialize};

/// Document-level attribution metadata shared by every chunk of a source.
///
/// `organization`, `organization_acronym`, and `author` stay optional here;
/// the citation extractor substitutes fixed placeholders for the first and
/// last so display layers never see a null in those positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocSource {
    /// Filesystem path of the original source document.
    pub source_path: String,
    /// File name of the original source document.
    pub filename: String,
    /// Document title. Falls back to the file name at citation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publishing organization (e.g. "Organización Mundial de la Salud").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Organization acronym (e.g. "OMS").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_acronym: Option<String>,
    /// Publication year, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Document author, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Public URL of the document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl DocSource {
    /// Metadata for a source that has no entry in the document index.
    ///
    /// Only path and filename are known; everything else stays absent and
    /// is rendered with placeholders at citation time.
    pub fn unindexed(source_path: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            filename: filename.into(),
            title: None,
            organization: None,
            organization_acronym: None,
            year: None,
            author: None,
            link: None,
        }
    }
}

/// A source document before chunking: its full extracted text plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The full text content of the document.
    pub content: String,
    /// Attribution metadata inherited by every chunk.
    pub source: DocSource,
}

/// An immutable unit of retrievable text.
///
/// Chunks are write-once: created at ingestion, never mutated afterwards,
/// and removed only by a full index reset. `chunk_index` records the chunk's
/// position within its source document, assigned in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The chunk's text content.
    pub content: String,
    /// Metadata of the document this chunk was cut from.
    pub source: DocSource,
    /// Position of this chunk within its source document.
    pub chunk_index: usize,
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] with its raw index distance and derived similarity.
///
/// `similarity` is `1 / (1 + distance)`, mapping distance 0 to 1.0 and
/// decaying toward 0 as distance grows. Created per query and discarded when
/// the request completes; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Raw distance reported by the index (non-negative, smaller is closer).
    pub distance: f32,
    /// Normalized similarity in `(0, 1]`.
    pub similarity: f32,
}
