//! Evaluation runner: executes test cases through a pipeline and aggregates
//! metrics into an [`EvalReport`].

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use nourai_rag::{QueryOutcome, RagPipeline};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bleu::{BleuScores, bleu};
use crate::cases::TestCase;
use crate::error::Result;
use crate::retrieval::{RetrievalScores, precision_recall};
use crate::rouge::{RougeScores, rouge};

/// Per-case evaluation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub test_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub question: String,
    pub answer: String,
    pub ground_truth: String,
    pub latency_seconds: f64,
    pub retrieved_docs: Vec<String>,
    pub relevant_docs: Vec<String>,
    pub retrieval: RetrievalScores,
    pub bleu: BleuScores,
    pub rouge: RougeScores,
}

/// Run-level counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMetadata {
    pub evaluation_date: DateTime<Utc>,
    pub total_test_cases: usize,
    pub successful_cases: usize,
    pub failed_cases: usize,
    pub coverage_percentage: f64,
    pub average_latency_seconds: f64,
}

/// Mean metric values across the successful cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalAverages {
    pub precision: f64,
    pub recall: f64,
    pub bleu: BleuScores,
    pub rouge: RougeScores,
}

/// The complete output of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub metadata: EvalMetadata,
    pub averages: EvalAverages,
    pub detailed_results: Vec<CaseResult>,
}

impl EvalReport {
    /// Serialize the report as pretty-printed JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Execute every test case against the pipeline and aggregate the metrics.
///
/// A case that ends in a dependency failure is logged, counted as failed,
/// and skipped; graceful-empty outcomes count as successful cases with no
/// retrieved documents. Retrieved document ids are the citation titles.
pub async fn run_evaluation(pipeline: &RagPipeline, cases: &[TestCase]) -> EvalReport {
    let mut results: Vec<CaseResult> = Vec::with_capacity(cases.len());
    let mut failed = 0usize;

    for (i, case) in cases.iter().enumerate() {
        info!(test_id = %case.id, progress = format!("{}/{}", i + 1, cases.len()), "running case");

        let started = Instant::now();
        let outcome =
            match pipeline.answer(&case.query, None, case.clinical_data.as_ref()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(test_id = %case.id, error = %e, "case failed");
                    failed += 1;
                    continue;
                }
            };
        let latency_seconds = started.elapsed().as_secs_f64();

        let answer = outcome.answer_text().to_string();
        let retrieved_docs: Vec<String> = match &outcome {
            QueryOutcome::Answered { citations, .. } =>
                citations.iter().map(|c| c.title.clone()).collect(),
            _ => Vec::new(),
        };

        results.push(CaseResult {
            test_id: case.id.clone(),
            category: case.category.clone(),
            difficulty: case.difficulty.clone(),
            question: case.query.clone(),
            answer: answer.clone(),
            ground_truth: case.expected_answer.clone(),
            latency_seconds,
            retrieval: precision_recall(&retrieved_docs, &case.relevant_docs),
            retrieved_docs,
            relevant_docs: case.relevant_docs.clone(),
            bleu: bleu(&answer, &case.expected_answer),
            rouge: rouge(&answer, &case.expected_answer),
        });
    }

    let total = cases.len();
    let successful = results.len();
    let coverage =
        if total == 0 { 0.0 } else { successful as f64 / total as f64 * 100.0 };
    let average_latency = mean(results.iter().map(|r| r.latency_seconds));

    EvalReport {
        metadata: EvalMetadata {
            evaluation_date: Utc::now(),
            total_test_cases: total,
            successful_cases: successful,
            failed_cases: failed,
            coverage_percentage: coverage,
            average_latency_seconds: average_latency,
        },
        averages: average_metrics(&results),
        detailed_results: results,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        0.0
    } else {
        collected.iter().sum::<f64>() / collected.len() as f64
    }
}

fn average_metrics(results: &[CaseResult]) -> EvalAverages {
    if results.is_empty() {
        return EvalAverages::default();
    }

    EvalAverages {
        precision: mean(results.iter().map(|r| r.retrieval.precision)),
        recall: mean(results.iter().map(|r| r.retrieval.recall)),
        bleu: BleuScores {
            bleu_1: mean(results.iter().map(|r| r.bleu.bleu_1)),
            bleu_2: mean(results.iter().map(|r| r.bleu.bleu_2)),
            bleu_3: mean(results.iter().map(|r| r.bleu.bleu_3)),
            bleu_4: mean(results.iter().map(|r| r.bleu.bleu_4)),
            bleu_avg: mean(results.iter().map(|r| r.bleu.bleu_avg)),
        },
        rouge: RougeScores {
            rouge_1: average_rouge(results, |r| r.rouge.rouge_1),
            rouge_2: average_rouge(results, |r| r.rouge.rouge_2),
            rouge_l: average_rouge(results, |r| r.rouge.rouge_l),
        },
    }
}

fn average_rouge(
    results: &[CaseResult],
    select: impl Fn(&CaseResult) -> crate::rouge::RougeScore,
) -> crate::rouge::RougeScore {
    crate::rouge::RougeScore {
        precision: mean(results.iter().map(|r| select(r).precision)),
        recall: mean(results.iter().map(|r| select(r).recall)),
        f1: mean(results.iter().map(|r| select(r).f1)),
    }
}
