//! ROUGE-1, ROUGE-2, and ROUGE-L text-overlap metrics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Precision, recall, and F1 for one ROUGE variant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl RougeScore {
    fn from_counts(overlap: usize, candidate_total: usize, reference_total: usize) -> Self {
        let precision =
            if candidate_total == 0 { 0.0 } else { overlap as f64 / candidate_total as f64 };
        let recall =
            if reference_total == 0 { 0.0 } else { overlap as f64 / reference_total as f64 };
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self { precision, recall, f1 }
    }
}

/// The three ROUGE variants computed for every generated/reference pair.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RougeScores {
    pub rouge_1: RougeScore,
    pub rouge_2: RougeScore,
    pub rouge_l: RougeScore,
}

/// Score a generated answer against a reference answer.
///
/// ROUGE-1 and ROUGE-2 count clipped n-gram overlap; ROUGE-L uses the
/// longest common subsequence of tokens. Tokens are lowercased whitespace
/// splits; no stemming is applied.
pub fn rouge(generated: &str, reference: &str) -> RougeScores {
    let candidate = tokenize(generated);
    let reference = tokenize(reference);

    RougeScores {
        rouge_1: rouge_n(&candidate, &reference, 1),
        rouge_2: rouge_n(&candidate, &reference, 2),
        rouge_l: rouge_l(&candidate, &reference),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

fn rouge_n(candidate: &[String], reference: &[String], n: usize) -> RougeScore {
    let candidate_counts = ngram_counts(candidate, n);
    let reference_counts = ngram_counts(reference, n);

    let candidate_total: usize = candidate_counts.values().sum();
    let reference_total: usize = reference_counts.values().sum();
    let overlap: usize = candidate_counts
        .iter()
        .map(|(ngram, count)| (*count).min(reference_counts.get(ngram).copied().unwrap_or(0)))
        .sum();

    RougeScore::from_counts(overlap, candidate_total, reference_total)
}

fn rouge_l(candidate: &[String], reference: &[String]) -> RougeScore {
    let lcs = lcs_length(candidate, reference);
    RougeScore::from_counts(lcs, candidate.len(), reference.len())
}

/// Longest common subsequence length via the classic two-row DP.
fn lcs_length(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for token_a in a {
        for (j, token_b) in b.iter().enumerate() {
            current[j + 1] =
                if token_a == token_b { previous[j] + 1 } else { current[j].max(previous[j + 1]) };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
