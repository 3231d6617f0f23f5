use super::SparseVector;

/// Cosine similarity `dot(a, b) / (‖a‖·‖b‖)`
///
/// Defined as 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Similarity of `query` against every vector in `candidates`, in input order
pub fn cosine_similarities<'a>(
    query: &SparseVector,
    candidates: impl IntoIterator<Item = &'a SparseVector>,
) -> Vec<f64> {
    let query_norm = query.norm();
    candidates
        .into_iter()
        .map(|candidate| {
            let denom = query_norm * candidate.norm();
            if denom == 0.0 {
                0.0
            } else {
                query.dot(candidate) / denom
            }
        })
        .collect()
}
