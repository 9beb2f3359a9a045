//! RAG pipeline orchestrator.
//!
//! [`RagPipeline`] composes an [`EmbeddingProvider`], a [`VectorIndex`], an
//! [`AnswerGenerator`], and a [`Chunker`] into the two workflows of the
//! system: ingestion (chunk → embed → store) and answering (expand → embed →
//! search → filter → compose → generate → cite).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nourai_rag::{InMemoryVectorIndex, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_index(Arc::new(InMemoryVectorIndex::new()))
//!     .generator(Arc::new(generator))
//!     .build()?;
//!
//! pipeline.ingest(&document).await?;
//! let outcome = pipeline.answer("¿qué debería comer?", None, None).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::citation::{Citation, extract_citations};
use crate::clinical::{ClinicalAttributes, clinical_context};
use crate::config::RagConfig;
use crate::document::{Chunk, Document};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::expand::expand_diet_query;
use crate::generation::AnswerGenerator;
use crate::prompt::{SYSTEM_PROMPT, compose_prompt};
use crate::scoring::filter_by_similarity;
use crate::vectorstore::VectorIndex;

/// Fixed answer when the index returns no chunks at all.
pub const NO_RESULTS_MESSAGE: &str = "No encontré información relevante en la base de datos.";

/// Fixed answer when every retrieved chunk fails the similarity threshold.
pub const INSUFFICIENT_RELEVANCE_MESSAGE: &str =
    "No encontré documentos con suficiente relevancia. Intenta reformular tu pregunta.";

/// The terminal outcome of one query.
///
/// The two empty-evidence variants are graceful, user-visible answer states,
/// never errors: callers branch on the variant instead of string-matching
/// canned text.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The index returned zero chunks.
    NoResults,
    /// Chunks were retrieved, but none met the similarity threshold.
    InsufficientRelevance,
    /// A generated answer grounded in the retained evidence.
    Answered {
        /// The generated answer text.
        answer: String,
        /// One citation per retained evidence chunk, in filter order.
        citations: Vec<Citation>,
    },
}

impl QueryOutcome {
    /// The user-visible answer text for this outcome.
    pub fn answer_text(&self) -> &str {
        match self {
            QueryOutcome::NoResults => NO_RESULTS_MESSAGE,
            QueryOutcome::InsufficientRelevance => INSUFFICIENT_RELEVANCE_MESSAGE,
            QueryOutcome::Answered { answer, .. } => answer,
        }
    }

    /// The citations attached to this outcome (empty for the graceful-empty
    /// variants).
    pub fn citations(&self) -> &[Citation] {
        match self {
            QueryOutcome::Answered { citations, .. } => citations,
            _ => &[],
        }
    }
}

/// The RAG pipeline orchestrator.
///
/// Stateless across invocations: every call runs the full request cycle from
/// scratch with no memory of prior queries. Safe to share behind an `Arc`
/// and invoke concurrently, provided the injected index and embedding
/// provider tolerate concurrent use.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    generator: Arc<dyn AnswerGenerator>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector index.
    pub fn vector_index(&self) -> &Arc<dyn VectorIndex> {
        &self.vector_index
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Returns the chunks that were stored, with embeddings attached.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if embedding or storage fails,
    /// including the source filename in the error message.
    pub async fn ingest(&self, document: &Document) -> Result<Vec<Chunk>> {
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(filename = %document.source.filename, chunk_count = 0, "ingested document (empty)");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();

        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(filename = %document.source.filename, error = %e, "embedding failed during ingestion");
            RagError::Pipeline(format!(
                "embedding failed for document '{}': {e}",
                document.source.filename
            ))
        })?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_index.add(&chunks).await.map_err(|e| {
            error!(filename = %document.source.filename, error = %e, "index add failed during ingestion");
            RagError::Pipeline(format!(
                "index add failed for document '{}': {e}",
                document.source.filename
            ))
        })?;

        let chunk_count = chunks.len();
        info!(filename = %document.source.filename, chunk_count, "ingested document");

        Ok(chunks)
    }

    /// Ingest multiple documents. Returns all chunks stored across them.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] on the first document that fails.
    pub async fn ingest_batch(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let mut all_chunks = Vec::new();
        for document in documents {
            all_chunks.extend(self.ingest(document).await?);
        }
        Ok(all_chunks)
    }

    /// Remove every chunk from the index.
    pub async fn reset_index(&self) -> Result<()> {
        self.vector_index.reset().await
    }

    /// Answer a query against the ingested corpus.
    ///
    /// Runs the full request cycle: expand the query for retrieval, embed it,
    /// search for the `top_k` nearest chunks (the configured default unless
    /// overridden), filter by similarity threshold, render the optional
    /// clinical context, compose the prompt around the ORIGINAL question, and
    /// generate. The two empty-evidence cases short-circuit into graceful
    /// [`QueryOutcome`] variants before any generation work.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] if `top_k` is zero (rejected before
    /// any retrieval work), or [`RagError::Pipeline`] if embedding, search,
    /// or generation fails. Dependency failures are never converted into
    /// graceful-empty outcomes.
    pub async fn answer(
        &self,
        query: &str,
        top_k: Option<usize>,
        clinical: Option<&ClinicalAttributes>,
    ) -> Result<QueryOutcome> {
        let top_k = top_k.unwrap_or(self.config.top_k);
        if top_k == 0 {
            return Err(RagError::InvalidInput("top_k must be a positive integer".to_string()));
        }

        // 1. Expand the query for retrieval only
        let search_query = expand_diet_query(query);

        // 2. Embed the expanded query
        let query_embedding = self.embedding_provider.embed(&search_query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        // 3. Nearest-neighbor search
        let results =
            self.vector_index.search(&query_embedding, top_k).await.map_err(|e| {
                error!(error = %e, "vector index search failed");
                RagError::Pipeline(format!("search failed: {e}"))
            })?;

        if results.is_empty() {
            info!("query returned no chunks");
            return Ok(QueryOutcome::NoResults);
        }

        // 4. Filter by similarity threshold
        let retained = filter_by_similarity(results, self.config.similarity_threshold);
        if retained.is_empty() {
            info!("no chunk met the similarity threshold");
            return Ok(QueryOutcome::InsufficientRelevance);
        }

        // 5. Compose the prompt around the original, non-expanded question
        let clinical_block = clinical_context(clinical);
        let prompt = compose_prompt(SYSTEM_PROMPT, &clinical_block, &retained, query);

        // 6. Generate
        let answer = self.generator.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "answer generation failed");
            RagError::Pipeline(format!("generation failed: {e}"))
        })?;

        // 7. Cite the retained evidence
        let citations = extract_citations(&retained);
        info!(citation_count = citations.len(), "query answered");

        Ok(QueryOutcome::Answered { answer, citations })
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config`, `embedding_provider`, `vector_index`, and `generator` are
/// required; the chunker defaults to a [`RecursiveChunker`] sized from the
/// config.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector index backend.
    pub fn vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.vector_index = Some(index);
        self
    }

    /// Set the answer generator.
    pub fn generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set a custom document chunker (optional).
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_index = self
            .vector_index
            .ok_or_else(|| RagError::Config("vector_index is required".to_string()))?;
        let generator =
            self.generator.ok_or_else(|| RagError::Config("generator is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)));

        Ok(RagPipeline { config, embedding_provider, vector_index, generator, chunker })
    }
}
