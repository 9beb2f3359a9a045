//! End-to-end pipeline tests with stub providers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nourai_rag::document::{Chunk, DocSource};
use nourai_rag::{
    AnswerGenerator, ClinicalAttributes, EmbeddingProvider, InMemoryVectorIndex,
    NO_RESULTS_MESSAGE, QueryOutcome, RagConfig, RagError, RagPipeline, VectorIndex,
};

/// Embeds every text to the same fixed vector and records the last input,
/// so tests can steer distances and observe query expansion.
struct StubEmbedder {
    vector: Vec<f32>,
    last_text: Mutex<Option<String>>,
}

impl StubEmbedder {
    fn new(vector: Vec<f32>) -> Self {
        Self { vector, last_text: Mutex::new(None) }
    }

    fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> nourai_rag::Result<Vec<f32>> {
        *self.last_text.lock().unwrap() = Some(text.to_string());
        Ok(self.vector.clone())
    }

    fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// Returns a canned answer and records the prompt it was handed.
struct StubGenerator {
    answer: String,
    last_prompt: Mutex<Option<String>>,
}

impl StubGenerator {
    fn new(answer: &str) -> Self {
        Self { answer: answer.to_string(), last_prompt: Mutex::new(None) }
    }

    fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> nourai_rag::Result<String> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(self.answer.clone())
    }
}

fn chunk(content: &str, title: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        content: content.to_string(),
        source: DocSource {
            title: Some(title.to_string()),
            ..DocSource::unindexed(format!("data/{title}.txt"), format!("{title}.txt"))
        },
        chunk_index: 0,
        embedding,
    }
}

fn pipeline(
    embedder: Arc<StubEmbedder>,
    index: Arc<InMemoryVectorIndex>,
    generator: Arc<StubGenerator>,
) -> RagPipeline {
    RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(embedder)
        .vector_index(index)
        .generator(generator)
        .build()
        .unwrap()
}

#[tokio::test]
async fn empty_index_short_circuits_to_no_results() {
    let embedder = Arc::new(StubEmbedder::new(vec![0.0]));
    let index = Arc::new(InMemoryVectorIndex::new());
    let generator = Arc::new(StubGenerator::new("no debería llamarse"));
    let pipeline = pipeline(embedder, index, generator.clone());

    let outcome = pipeline.answer("¿qué es la fibra?", None, None).await.unwrap();

    assert_eq!(outcome, QueryOutcome::NoResults);
    assert_eq!(outcome.answer_text(), NO_RESULTS_MESSAGE);
    assert!(outcome.citations().is_empty());
    // generation must never run for a graceful-empty outcome
    assert!(generator.last_prompt().is_none());
}

#[tokio::test]
async fn all_chunks_below_threshold_short_circuit_to_insufficient_relevance() {
    // query embeds to 1.5, stored chunk at 0.0: distance 1.5, similarity 0.4
    let embedder = Arc::new(StubEmbedder::new(vec![1.5]));
    let index = Arc::new(InMemoryVectorIndex::new());
    index.add(&[chunk("texto lejano", "guia-lejana", vec![0.0])]).await.unwrap();
    let generator = Arc::new(StubGenerator::new("no debería llamarse"));
    let pipeline = pipeline(embedder, index, generator.clone());

    let outcome = pipeline.answer("¿qué es la fibra?", None, None).await.unwrap();

    assert_eq!(outcome, QueryOutcome::InsufficientRelevance);
    assert!(outcome.citations().is_empty());
    assert!(generator.last_prompt().is_none());
}

#[tokio::test]
async fn similarity_exactly_at_threshold_is_retained() {
    // distance exactly 1.0 gives similarity 0.5, the default threshold
    let embedder = Arc::new(StubEmbedder::new(vec![1.0]));
    let index = Arc::new(InMemoryVectorIndex::new());
    index.add(&[chunk("texto límite", "guia-limite", vec![0.0])]).await.unwrap();
    let generator = Arc::new(StubGenerator::new("respuesta"));
    let pipeline = pipeline(embedder, index, generator);

    let outcome = pipeline.answer("¿qué es la fibra?", None, None).await.unwrap();

    let citations = outcome.citations();
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].similarity, "50.0%");
}

#[tokio::test]
async fn answered_outcome_cites_retained_chunks_in_order() {
    let embedder = Arc::new(StubEmbedder::new(vec![0.0]));
    let index = Arc::new(InMemoryVectorIndex::new());
    index
        .add(&[
            chunk("texto cercano", "guia-cercana", vec![0.0]),
            chunk("texto medio", "guia-media", vec![0.5]),
            chunk("texto irrelevante", "guia-irrelevante", vec![4.0]),
        ])
        .await
        .unwrap();
    let generator = Arc::new(StubGenerator::new("respuesta generada"));
    let pipeline = pipeline(embedder, index, generator);

    let outcome = pipeline.answer("¿qué es la fibra?", None, None).await.unwrap();

    match outcome {
        QueryOutcome::Answered { answer, citations } => {
            assert_eq!(answer, "respuesta generada");
            // the chunk at distance 4.0 (similarity 0.2) is filtered out
            assert_eq!(citations.len(), 2);
            assert_eq!(citations[0].title, "guia-cercana");
            assert_eq!(citations[1].title, "guia-media");
            assert_eq!(citations[0].similarity, "100.0%");
        }
        other => panic!("expected Answered, got {other:?}"),
    }
}

#[tokio::test]
async fn meal_plan_query_carries_allergies_and_policy_into_the_prompt() {
    let embedder = Arc::new(StubEmbedder::new(vec![0.0]));
    let index = Arc::new(InMemoryVectorIndex::new());
    index
        .add(&[chunk("Guía de alimentación equilibrada.", "guia-fao", vec![0.0])])
        .await
        .unwrap();
    let generator = Arc::new(StubGenerator::new("| Día | ... tabla completa"));
    let pipeline = pipeline(embedder.clone(), index, generator.clone());

    let clinical =
        ClinicalAttributes { allergies: vec!["maní".to_string()], ..Default::default() };
    let outcome =
        pipeline.answer("dame un plan de alimentación", None, Some(&clinical)).await.unwrap();

    assert!(matches!(outcome, QueryOutcome::Answered { .. }));

    let prompt = generator.last_prompt().expect("generator was invoked");
    // allergy exclusion is a correctness-critical instruction
    assert!(prompt.contains("Alergias: maní"));
    // the fixed educational disclaimer instruction is always present
    assert!(prompt.contains("Nota: Esta información educativa se basa en guías oficiales"));
    // the prompt embeds the original, non-expanded question
    assert!(prompt.contains("Pregunta: dame un plan de alimentación"));
    assert!(!prompt.contains("nutrición saludable alimentos recomendados"));

    // while the embedded retrieval query was the expanded one
    let embedded = embedder.last_text().expect("embedder was invoked");
    assert!(embedded.starts_with("dame un plan de alimentación"));
    assert!(embedded.contains("nutrición saludable alimentos recomendados plan alimenticio"));
}

#[tokio::test]
async fn zero_top_k_is_rejected_before_retrieval() {
    let embedder = Arc::new(StubEmbedder::new(vec![0.0]));
    let index = Arc::new(InMemoryVectorIndex::new());
    let generator = Arc::new(StubGenerator::new("respuesta"));
    let pipeline = pipeline(embedder.clone(), index, generator);

    let result = pipeline.answer("¿qué es la fibra?", Some(0), None).await;

    assert!(matches!(result, Err(RagError::InvalidInput(_))));
    // rejected before any embedding work
    assert!(embedder.last_text().is_none());
}

#[tokio::test]
async fn ingest_chunks_embeds_and_stores() {
    let embedder = Arc::new(StubEmbedder::new(vec![0.25, 0.5]));
    let index = Arc::new(InMemoryVectorIndex::new());
    let generator = Arc::new(StubGenerator::new("respuesta"));
    let pipeline = pipeline(embedder, index.clone(), generator);

    let document = nourai_rag::Document {
        content: "La fibra dietética contribuye a la salud digestiva. ".repeat(30),
        source: DocSource::unindexed("data/fibra.txt", "fibra.txt"),
    };

    let stored = pipeline.ingest(&document).await.unwrap();
    assert!(stored.len() > 1);
    assert_eq!(index.len().await.unwrap(), stored.len());
    assert!(stored.iter().all(|c| c.embedding == vec![0.25, 0.5]));

    // stored chunks carry the stub embedding
    let results = index.search(&[0.25, 0.5], 1).await.unwrap();
    assert_eq!(results[0].1, 0.0);
}
