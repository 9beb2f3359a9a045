//! Command-line launcher for the Nourai nutrition assistant.

mod corpus;
mod index;
mod snapshot;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use nourai_chat::{ChatStore, InMemoryChatStore, SqliteChatStore};
use nourai_eval::{load_test_cases, print_summary, run_evaluation};
use nourai_rag::{
    InMemoryVectorIndex, OllamaEmbedder, OllamaGenerator, QueryOutcome, RagConfig, RagPipeline,
    VectorIndex,
};
use nourai_server::AppState;

use crate::index::DocumentIndex;

#[derive(Parser)]
#[command(name = "nourai", version, about = "Retrieval-augmented nutrition assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct ModelArgs {
    /// Ollama server base URL
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Embedding model served by Ollama
    #[arg(long, default_value = "nomic-embed-text")]
    embedding_model: String,

    /// Embedding dimensionality of the chosen model
    #[arg(long, default_value_t = 768)]
    embedding_dimensions: usize,

    /// Generation model served by Ollama
    #[arg(long, default_value = "llama3.2:3b")]
    generation_model: String,
}

#[derive(Args, Clone)]
struct SnapshotArgs {
    /// Path of the embedded-chunk snapshot
    #[arg(long, default_value = "data/index.json")]
    snapshot: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a corpus directory into the index snapshot
    Populate {
        /// Directory of extracted-text sources (.txt/.md)
        #[arg(long, default_value = "data/docs")]
        docs_dir: PathBuf,

        /// Document index JSON with attribution metadata
        #[arg(long, default_value = "documents_index.json")]
        index_file: PathBuf,

        /// Discard the existing snapshot before ingesting
        #[arg(long)]
        reset: bool,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Answer one query against the ingested corpus
    Query {
        /// Your question
        query: String,

        /// Number of documents to retrieve
        #[arg(long)]
        top_k: Option<usize>,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Start the HTTP server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,

        /// SQLite URL for chat history (in-memory store when omitted)
        #[arg(long)]
        chat_db: Option<String>,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Run the offline evaluation harness
    Eval {
        /// JSON file of test cases
        #[arg(long)]
        cases: PathBuf,

        /// Write the full report as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        model: ModelArgs,
    },
}

fn build_pipeline(model: &ModelArgs) -> anyhow::Result<(RagPipeline, Arc<InMemoryVectorIndex>)> {
    let embedder = OllamaEmbedder::new()
        .with_base_url(&model.ollama_url)
        .with_model(&model.embedding_model, model.embedding_dimensions);
    let generator =
        OllamaGenerator::new().with_base_url(&model.ollama_url).with_model(&model.generation_model);
    let index = Arc::new(InMemoryVectorIndex::new());

    let pipeline = RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(embedder))
        .vector_index(index.clone())
        .generator(Arc::new(generator))
        .build()
        .context("building RAG pipeline")?;

    Ok((pipeline, index))
}

async fn load_snapshot_into(
    path: &Path,
    index: &InMemoryVectorIndex,
) -> anyhow::Result<()> {
    let chunks = snapshot::load(path)?;
    index.add(&chunks).await.context("loading snapshot into index")?;
    Ok(())
}

async fn populate(
    docs_dir: &Path,
    index_file: &Path,
    reset: bool,
    snapshot_path: &Path,
    model: &ModelArgs,
) -> anyhow::Result<()> {
    let document_index = if index_file.exists() {
        DocumentIndex::load(index_file)?
    } else {
        println!("No document index at {}; using file names only", index_file.display());
        DocumentIndex::default()
    };

    let documents = corpus::load_corpus(docs_dir, &document_index)?;
    if documents.is_empty() {
        println!("No documents found!");
        return Ok(());
    }

    let (pipeline, _index) = build_pipeline(model)?;

    let mut all_chunks = Vec::new();
    if !reset && snapshot_path.exists() {
        all_chunks = snapshot::load(snapshot_path)?;
        println!("Keeping {} existing chunks", all_chunks.len());
    }

    let new_chunks = pipeline.ingest_batch(&documents).await?;
    println!("Created {} chunks from {} documents", new_chunks.len(), documents.len());

    all_chunks.extend(new_chunks);
    snapshot::save(snapshot_path, &all_chunks)?;
    println!("Total chunks in index: {}", all_chunks.len());

    Ok(())
}

async fn query(
    query_text: &str,
    top_k: Option<usize>,
    snapshot_path: &Path,
    model: &ModelArgs,
) -> anyhow::Result<()> {
    let (pipeline, index) = build_pipeline(model)?;
    load_snapshot_into(snapshot_path, &index).await?;

    let outcome = pipeline.answer(query_text, top_k, None).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &QueryOutcome) {
    let divider = "=".repeat(80);

    println!("\n{divider}");
    println!("RESPUESTA:");
    println!("{divider}");
    println!("{}", outcome.answer_text());

    let citations = outcome.citations();
    println!("\n{divider}");
    println!("FUENTES ({}):", citations.len());
    println!("{divider}");
    for (i, citation) in citations.iter().enumerate() {
        println!("{}. {}", i + 1, citation.title);
        println!("   Organización: {}", citation.organization);
        if let Some(year) = citation.year {
            println!("   Año: {year}");
        }
        println!("   Autor: {}", citation.author);
        if let Some(link) = &citation.link {
            println!("   Link: {link}");
        }
        println!("   Similitud: {}", citation.similarity);
        println!();
    }
    println!("{divider}\n");
}

async fn serve(
    addr: SocketAddr,
    chat_db: Option<&str>,
    snapshot_path: &Path,
    model: &ModelArgs,
) -> anyhow::Result<()> {
    let (pipeline, index) = build_pipeline(model)?;
    if snapshot_path.exists() {
        load_snapshot_into(snapshot_path, &index).await?;
    } else {
        println!("No index snapshot at {}; starting with an empty corpus", snapshot_path.display());
    }

    let chats: Arc<dyn ChatStore> = match chat_db {
        Some(url) => Arc::new(SqliteChatStore::connect(url).await?),
        None => Arc::new(InMemoryChatStore::new()),
    };

    let state = AppState::new(Arc::new(pipeline), chats);
    nourai_server::serve(addr, state).await?;
    Ok(())
}

async fn eval(
    cases_path: &Path,
    output: Option<&Path>,
    snapshot_path: &Path,
    model: &ModelArgs,
) -> anyhow::Result<()> {
    let cases = load_test_cases(cases_path)
        .with_context(|| format!("loading test cases from {}", cases_path.display()))?;
    println!("Loaded {} test cases", cases.len());

    let (pipeline, index) = build_pipeline(model)?;
    load_snapshot_into(snapshot_path, &index).await?;

    let report = run_evaluation(&pipeline, &cases).await;
    print_summary(&report);

    if let Some(output) = output {
        report.write_json(output)?;
        println!("Report written to {}", output.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Populate { docs_dir, index_file, reset, snapshot, model } => {
            populate(&docs_dir, &index_file, reset, &snapshot.snapshot, &model).await
        }
        Command::Query { query: query_text, top_k, snapshot, model } => {
            query(&query_text, top_k, &snapshot.snapshot, &model).await
        }
        Command::Serve { addr, chat_db, snapshot, model } => {
            serve(addr, chat_db.as_deref(), &snapshot.snapshot, &model).await
        }
        Command::Eval { cases, output, snapshot, model } => {
            eval(&cases, output.as_deref(), &snapshot.snapshot, &model).await
        }
    }
}
