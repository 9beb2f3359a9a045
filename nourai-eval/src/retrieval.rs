//! Set-based retrieval precision and recall.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Precision and recall of retrieved document ids against a relevant set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrievalScores {
    pub precision: f64,
    pub recall: f64,
}

/// Compute `|retrieved ∩ relevant| / |retrieved|` and
/// `|retrieved ∩ relevant| / |relevant|` over deduplicated ids.
///
/// An empty retrieved set yields precision 0; an empty relevant set yields
/// recall 0.
pub fn precision_recall(retrieved: &[String], relevant: &[String]) -> RetrievalScores {
    let retrieved_set: HashSet<&str> = retrieved.iter().map(String::as_str).collect();
    let relevant_set: HashSet<&str> = relevant.iter().map(String::as_str).collect();
    let intersection = retrieved_set.intersection(&relevant_set).count();

    let precision = if retrieved_set.is_empty() {
        0.0
    } else {
        intersection as f64 / retrieved_set.len() as f64
    };
    let recall = if relevant_set.is_empty() {
        0.0
    } else {
        intersection as f64 / relevant_set.len() as f64
    };

    RetrievalScores { precision, recall }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_overlap_is_perfect() {
        let scores = precision_recall(&ids(&["a", "b"]), &ids(&["a", "b"]));
        assert_eq!(scores.precision, 1.0);
        assert_eq!(scores.recall, 1.0);
    }

    #[test]
    fn partial_overlap() {
        let scores = precision_recall(&ids(&["a", "b", "c", "d"]), &ids(&["a", "x"]));
        assert_eq!(scores.precision, 0.25);
        assert_eq!(scores.recall, 0.5);
    }

    #[test]
    fn empty_sets_score_zero() {
        let scores = precision_recall(&[], &ids(&["a"]));
        assert_eq!(scores.precision, 0.0);
        assert_eq!(scores.recall, 0.0);

        let scores = precision_recall(&ids(&["a"]), &[]);
        assert_eq!(scores.recall, 0.0);
    }

    #[test]
    fn duplicates_are_counted_once() {
        let scores = precision_recall(&ids(&["a", "a", "b"]), &ids(&["a"]));
        assert_eq!(scores.precision, 0.5);
        assert_eq!(scores.recall, 1.0);
    }
}
