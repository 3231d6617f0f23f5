use std::collections::BTreeMap;

/// Sparse vector in the vectorizer's feature space
///
/// Entries are kept sorted by index with no duplicates and no explicit zeros,
/// so dot products can be computed with a single merge pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Creates an all-zero vector of the given dimensionality
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Builds a vector from `(index, value)` pairs
    ///
    /// Pairs may arrive in any order; repeated indices are summed and indices
    /// outside `dim` are dropped.
    pub fn from_pairs(dim: usize, pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut acc: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, value) in pairs {
            if index < dim {
                *acc.entry(index).or_insert(0.0) += value;
            }
        }
        Self::from_sorted_map(dim, acc)
    }

    fn from_sorted_map(dim: usize, map: BTreeMap<usize, f64>) -> Self {
        let entries = map.into_iter().filter(|(_, v)| *v != 0.0).collect();
        Self { dim, entries }
    }

    /// Weighted element-wise sum `Σ weight_i × vector_i`
    ///
    /// The sum stays sparse; only indices touched by some input are stored.
    pub fn weighted_sum<'a>(
        dim: usize,
        terms: impl IntoIterator<Item = (&'a SparseVector, f64)>,
    ) -> Self {
        let mut acc: BTreeMap<usize, f64> = BTreeMap::new();
        for (vector, weight) in terms {
            for &(index, value) in &vector.entries {
                *acc.entry(index).or_insert(0.0) += weight * value;
            }
        }
        Self::from_sorted_map(dim, acc)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Value at `index`, zero when not stored
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_val) = self.entries[i];
            let (b_idx, b_val) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_val * b_val;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Euclidean (L2) norm
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Returns a copy scaled to unit length, or unchanged when the norm is zero
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        Self {
            dim: self.dim,
            entries: self.entries.iter().map(|&(i, v)| (i, v / norm)).collect(),
        }
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(index, value) in &self.entries {
            dense[index] = value;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(5, vec![(3, 1.0), (1, 2.0), (3, 0.5), (9, 4.0)]);
        assert_eq!(v.entries(), &[(1, 2.0), (3, 1.5)]);
        assert_eq!(v.dim(), 5);
    }

    #[test]
    fn test_from_pairs_drops_zeros() {
        let v = SparseVector::from_pairs(4, vec![(0, 1.0), (0, -1.0), (2, 3.0)]);
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get(0), 0.0);
        assert_eq!(v.get(2), 3.0);
    }

    #[test]
    fn test_dot_only_counts_shared_indices() {
        let a = SparseVector::from_pairs(6, vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseVector::from_pairs(6, vec![(2, 4.0), (3, 1.0), (5, 1.0)]);
        assert_eq!(a.dot(&b), 2.0 * 4.0 + 3.0 * 1.0);
    }

    #[test]
    fn test_weighted_sum() {
        let a = SparseVector::from_pairs(3, vec![(0, 1.0), (1, 1.0)]);
        let b = SparseVector::from_pairs(3, vec![(1, 2.0), (2, 4.0)]);
        let sum = SparseVector::weighted_sum(3, vec![(&a, 0.5), (&b, 0.25)]);
        assert_eq!(sum.to_dense(), vec![0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_normalized_zero_vector_is_unchanged() {
        let zero = SparseVector::zeros(3);
        assert_eq!(zero.normalized(), zero);
        assert_eq!(zero.norm(), 0.0);
    }

    #[test]
    fn test_normalized_has_unit_norm() {
        let v = SparseVector::from_pairs(2, vec![(0, 3.0), (1, 4.0)]);
        let n = v.normalized();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.get(0) - 0.6).abs() < 1e-12);
    }
}
