//! Document-level attribution for retained evidence chunks.

use serde::{Deserialize, Serialize};

use crate::document::ScoredChunk;

/// Placeholder rendered when a source has no organization on record.
pub const UNSPECIFIED_ORGANIZATION: &str = "Organización no especificada";

/// Placeholder rendered when a source has no author on record.
pub const UNSPECIFIED_AUTHOR: &str = "Autor no especificado";

/// Attribution metadata for one retained evidence chunk.
///
/// `organization` and `author` are always populated (placeholders stand in
/// for missing metadata), while `year` and `link` pass through as-is.
/// `similarity` is a display string with one decimal place, e.g. `"82.3%"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub title: String,
    pub organization: String,
    #[serde(default)]
    pub organization_acronym: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub similarity: String,
}

/// Derive one citation per surviving chunk, preserving the filter's order.
pub fn extract_citations(chunks: &[ScoredChunk]) -> Vec<Citation> {
    chunks.iter().map(citation_for).collect()
}

fn citation_for(scored: &ScoredChunk) -> Citation {
    let source = &scored.chunk.source;
    Citation {
        title: source.title.clone().unwrap_or_else(|| source.filename.clone()),
        organization: source
            .organization
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_ORGANIZATION.to_string()),
        organization_acronym: source.organization_acronym.clone().unwrap_or_default(),
        year: source.year,
        author: source.author.clone().unwrap_or_else(|| UNSPECIFIED_AUTHOR.to_string()),
        link: source.link.clone(),
        similarity: format!("{:.1}%", scored.similarity * 100.0),
    }
}
