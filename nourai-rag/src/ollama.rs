//! Ollama-backed embedding and generation providers.
//!
//! This module is only available when the `ollama` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::AnswerGenerator;

/// The default Ollama server address.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default embedding model served by Ollama.
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// The dimensionality of `nomic-embed-text` embeddings.
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

/// The default generation model.
const DEFAULT_GENERATION_MODEL: &str = "llama3.2:3b";

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::Embedding { provider: "Ollama".into(), message: message.into() }
}

fn generation_error(message: impl Into<String>) -> RagError {
    RagError::Generation { backend: "Ollama".into(), message: message.into() }
}

/// An [`EmbeddingProvider`] backed by a local Ollama server.
///
/// Calls `POST {base_url}/api/embed`. The same instance must serve both
/// ingestion and query embedding; construct it once and share it.
///
/// # Example
///
/// ```rust,ignore
/// use nourai_rag::ollama::OllamaEmbedder;
///
/// let embedder = OllamaEmbedder::new().with_model("all-minilm", 384);
/// let embedding = embedder.embed("hola mundo").await?;
/// ```
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl Default for OllamaEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaEmbedder {
    /// Create a provider pointed at the default local Ollama server.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }

    /// Set the embedding model and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    /// Set the Ollama server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Ollama", text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| embedding_error("API returned empty response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "Ollama", batch_size = texts.len(), model = %self.model, "embedding batch");

        let url = format!("{}/api/embed", self.base_url);
        let request_body = EmbedRequest { model: &self.model, input: texts.to_vec() };

        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(provider = "Ollama", error = %e, "embed request failed");
                embedding_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "Ollama", %status, "embed API error");
            return Err(embedding_error(format!("API returned {status}: {body}")));
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse embed response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(embedding_error(format!(
                "API returned {} embeddings for {} inputs",
                embed_response.embeddings.len(),
                texts.len()
            )));
        }

        Ok(embed_response.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// An [`AnswerGenerator`] backed by a local Ollama server.
///
/// Calls `POST {base_url}/api/generate` with streaming disabled: one
/// blocking call per request, no retry, no client-side timeout.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaGenerator {
    /// Create a generator pointed at the default local Ollama server.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_GENERATION_MODEL.into(),
        }
    }

    /// Set the generation model (e.g. `mistral:instruct`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the Ollama server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(backend = "Ollama", model = %self.model, prompt_len = prompt.len(), "generating answer");

        let url = format!("{}/api/generate", self.base_url);
        let request_body = GenerateRequest { model: &self.model, prompt, stream: false };

        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(backend = "Ollama", error = %e, "generate request failed");
                generation_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(backend = "Ollama", %status, "generate API error");
            return Err(generation_error(format!("API returned {status}: {body}")));
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(backend = "Ollama", error = %e, "failed to parse generate response");
            generation_error(format!("failed to parse response: {e}"))
        })?;

        Ok(generate_response.response)
    }
}
