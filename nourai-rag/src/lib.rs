//! Retrieval-augmented generation core for the Nourai nutrition assistant.
//!
//! This crate turns a natural-language query and optional patient context
//! into a ranked, threshold-filtered set of evidence chunks, a composed
//! generation prompt under a strict answer-formatting contract, and a
//! generated answer with traceable citations.
//!
//! The [`RagPipeline`] orchestrates the cycle:
//!
//! 1. [`expand_diet_query`] widens under-specified diet questions for
//!    retrieval (the original question is kept for prompting).
//! 2. An [`EmbeddingProvider`] encodes the query.
//! 3. A [`VectorIndex`] returns the nearest chunks with raw distances.
//! 4. [`filter_by_similarity`] converts distances to `1 / (1 + d)` scores
//!    and drops chunks below the configured threshold.
//! 5. [`clinical_context`] renders patient attributes, omitting absent
//!    fields.
//! 6. [`compose_prompt`] merges policy, context, evidence, and question.
//! 7. An [`AnswerGenerator`] produces the answer in one blocking call.
//! 8. [`extract_citations`] maps the retained chunks to document-level
//!    attribution.
//!
//! Empty-evidence cases resolve into the graceful [`QueryOutcome`] variants
//! [`QueryOutcome::NoResults`] and [`QueryOutcome::InsufficientRelevance`]
//! rather than errors.

pub mod chunking;
pub mod citation;
pub mod clinical;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod expand;
pub mod generation;
pub mod inmemory;
pub mod pipeline;
pub mod prompt;
pub mod scoring;
pub mod vectorstore;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use chunking::{Chunker, RecursiveChunker};
pub use citation::{Citation, UNSPECIFIED_AUTHOR, UNSPECIFIED_ORGANIZATION, extract_citations};
pub use clinical::{ClinicalAttributes, clinical_context};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, DocSource, Document, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use expand::expand_diet_query;
pub use generation::AnswerGenerator;
pub use inmemory::InMemoryVectorIndex;
pub use pipeline::{
    INSUFFICIENT_RELEVANCE_MESSAGE, NO_RESULTS_MESSAGE, QueryOutcome, RagPipeline,
    RagPipelineBuilder,
};
pub use prompt::{CHUNK_SEPARATOR, PROMPT_TEMPLATE, SYSTEM_PROMPT, compose_prompt};
pub use scoring::{filter_by_similarity, similarity};
pub use vectorstore::VectorIndex;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaEmbedder, OllamaGenerator};
