//! Property tests for similarity scoring and threshold filtering.

use nourai_rag::document::{Chunk, DocSource};
use nourai_rag::{filter_by_similarity, similarity};
use proptest::prelude::*;

fn chunk(tag: usize) -> Chunk {
    Chunk {
        content: format!("chunk {tag}"),
        source: DocSource::unindexed("data/guide.txt", "guide.txt"),
        chunk_index: tag,
        embedding: Vec::new(),
    }
}

proptest! {
    /// For any distance `d >= 0`, the similarity lies in `(0, 1]`.
    #[test]
    fn similarity_stays_in_unit_interval(distance in 0.0f32..1.0e6) {
        let s = similarity(distance);
        prop_assert!(s > 0.0);
        prop_assert!(s <= 1.0);
    }

    /// Similarity is strictly decreasing in distance.
    #[test]
    fn similarity_strictly_decreases(d1 in 0.0f32..100.0, delta in 0.01f32..10.0) {
        let d2 = d1 + delta;
        prop_assert!(similarity(d2) < similarity(d1));
    }

    /// The filter keeps survivors in input order and drops exactly the
    /// results whose similarity falls below the threshold.
    #[test]
    fn filter_is_an_order_preserving_subsequence(
        distances in proptest::collection::vec(0.0f32..5.0, 0..20),
        threshold in 0.0f32..1.0,
    ) {
        let results: Vec<(Chunk, f32)> =
            distances.iter().enumerate().map(|(i, d)| (chunk(i), *d)).collect();

        let retained = filter_by_similarity(results, threshold);

        // exactly the above-threshold results survive
        let expected: Vec<usize> = distances
            .iter()
            .enumerate()
            .filter(|(_, d)| similarity(**d) >= threshold)
            .map(|(i, _)| i)
            .collect();
        let actual: Vec<usize> = retained.iter().map(|s| s.chunk.chunk_index).collect();
        prop_assert_eq!(actual, expected);

        // each survivor carries its derived similarity
        for scored in &retained {
            prop_assert_eq!(scored.similarity, similarity(scored.distance));
        }
    }
}
