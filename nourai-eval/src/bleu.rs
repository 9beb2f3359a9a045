//! Sentence-level BLEU with add-epsilon smoothing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Epsilon substituted for zero n-gram matches so short or divergent answers
/// still score above zero instead of collapsing the geometric mean.
const SMOOTHING_EPSILON: f64 = 0.1;

/// BLEU-1 through BLEU-4 plus their mean.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BleuScores {
    pub bleu_1: f64,
    pub bleu_2: f64,
    pub bleu_3: f64,
    pub bleu_4: f64,
    pub bleu_avg: f64,
}

/// Score a generated answer against a reference answer.
///
/// Tokens are lowercased whitespace splits. Each BLEU-k is the brevity
/// penalty times the geometric mean of the modified n-gram precisions for
/// `n = 1..=k`, with zero match counts smoothed to a small epsilon.
pub fn bleu(generated: &str, reference: &str) -> BleuScores {
    let candidate = tokenize(generated);
    let reference = tokenize(reference);

    if candidate.is_empty() {
        return BleuScores::default();
    }

    let precisions: Vec<f64> =
        (1..=4).map(|n| modified_precision(&candidate, &reference, n)).collect();
    let bp = brevity_penalty(candidate.len(), reference.len());

    let bleu_1 = bp * geometric_mean(&precisions[..1]);
    let bleu_2 = bp * geometric_mean(&precisions[..2]);
    let bleu_3 = bp * geometric_mean(&precisions[..3]);
    let bleu_4 = bp * geometric_mean(&precisions[..4]);

    BleuScores {
        bleu_1,
        bleu_2,
        bleu_3,
        bleu_4,
        bleu_avg: (bleu_1 + bleu_2 + bleu_3 + bleu_4) / 4.0,
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

/// Clipped n-gram precision: candidate n-gram counts are capped by their
/// reference counts before dividing by the candidate total.
fn modified_precision(candidate: &[String], reference: &[String], n: usize) -> f64 {
    let candidate_counts = ngram_counts(candidate, n);
    let total: usize = candidate_counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    let reference_counts = ngram_counts(reference, n);
    let matched: usize = candidate_counts
        .iter()
        .map(|(ngram, count)| (*count).min(reference_counts.get(ngram).copied().unwrap_or(0)))
        .sum();

    if matched == 0 {
        SMOOTHING_EPSILON / total as f64
    } else {
        matched as f64 / total as f64
    }
}

fn brevity_penalty(candidate_len: usize, reference_len: usize) -> f64 {
    if candidate_len > reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}

fn geometric_mean(precisions: &[f64]) -> f64 {
    if precisions.iter().any(|p| *p == 0.0) {
        return 0.0;
    }
    let log_sum: f64 = precisions.iter().map(|p| p.ln()).sum();
    (log_sum / precisions.len() as f64).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sentences_score_one() {
        let text = "una dieta equilibrada incluye frutas y verduras frescas";
        let scores = bleu(text, text);
        assert!((scores.bleu_1 - 1.0).abs() < 1e-9);
        assert!((scores.bleu_4 - 1.0).abs() < 1e-9);
        assert!((scores.bleu_avg - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_sentences_score_low_but_positive() {
        let scores = bleu("rojo verde azul amarillo", "norte sur este oeste");
        assert!(scores.bleu_1 > 0.0);
        assert!(scores.bleu_1 < 0.1);
    }

    #[test]
    fn tokenization_is_case_insensitive() {
        let scores = bleu("Frutas Y Verduras", "frutas y verduras");
        assert!((scores.bleu_1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_candidate_scores_zero() {
        let scores = bleu("", "referencia");
        assert_eq!(scores, BleuScores::default());
    }

    #[test]
    fn short_candidate_is_penalized() {
        // candidate matches but is half the reference length
        let scores = bleu("frutas y", "frutas y verduras frescas");
        assert!(scores.bleu_1 < 1.0);
        assert!(scores.bleu_1 > 0.0);
    }
}
