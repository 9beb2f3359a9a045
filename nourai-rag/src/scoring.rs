//! Distance-to-similarity conversion and threshold filtering.

use crate::document::{Chunk, ScoredChunk};

/// Convert a raw index distance into a normalized similarity score.
///
/// For any distance `d >= 0` the result lies in `(0, 1]`: distance 0 maps to
/// exactly 1.0 and the score decays monotonically as distance grows.
pub fn similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// Drop search results whose similarity falls below `threshold`.
///
/// Results at exactly the threshold are retained. The input order (assumed
/// distance-ascending from the index) is preserved for the survivors.
pub fn filter_by_similarity(results: Vec<(Chunk, f32)>, threshold: f32) -> Vec<ScoredChunk> {
    results
        .into_iter()
        .filter_map(|(chunk, distance)| {
            let similarity = similarity(distance);
            (similarity >= threshold).then(|| ScoredChunk { chunk, distance, similarity })
        })
        .collect()
}
