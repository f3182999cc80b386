//! Top-K selection over score vectors

use ndarray::ArrayView1;

/// Indices of the `k` highest scores, best first.
///
/// Returns fewer than `k` indices only when the vector itself is shorter.
/// Tie order is unspecified.
pub fn top_k_indices(scores: ArrayView1<'_, f32>, k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    let k = k.min(indices.len());
    if k == 0 {
        return Vec::new();
    }

    let by_score_desc = |a: &usize, b: &usize| scores[*b].total_cmp(&scores[*a]);
    if k < indices.len() {
        indices.select_nth_unstable_by(k - 1, by_score_desc);
        indices.truncate(k);
    }
    indices.sort_unstable_by(by_score_desc);
    indices
}
