use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Sparse term-weight vector: `(term index, weight)` pairs sorted by index.
///
/// Weights are TF-IDF values and therefore non-negative, which keeps cosine
/// similarity inside `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVec {
    entries: Vec<(u32, f32)>,
}

impl SparseVec {
    /// Build from unsorted `(index, weight)` pairs. Zero weights are dropped.
    pub fn from_entries(mut entries: Vec<(u32, f32)>) -> Self {
        entries.retain(|&(_, weight)| weight != 0.0);
        entries.sort_unstable_by_key(|&(idx, _)| idx);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.entries.iter().copied()
    }

    /// Euclidean norm, accumulated in f64.
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, weight)| {
                let weight = weight as f64;
                weight * weight
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Cosine similarity between two sparse vectors.
///
/// Merge-join over the sorted index lists; the epsilon in the denominator
/// turns the zero-vector case into a 0.0 score instead of NaN.
pub fn cosine(a: &SparseVec, b: &SparseVec) -> f64 {
    let mut a_it = a.iter().fuse();
    let mut b_it = b.iter().fuse();
    let mut a_next = a_it.next();
    let mut b_next = b_it.next();
    let mut dot = 0_f64;
    while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
        match ia.cmp(&ib) {
            Ordering::Equal => {
                dot += va as f64 * vb as f64;
                a_next = a_it.next();
                b_next = b_it.next();
            }
            Ordering::Less => a_next = a_it.next(),
            Ordering::Greater => b_next = b_it.next(),
        }
    }
    dot / (a.norm() * b.norm() + f64::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_sorted_and_zeroes_dropped() {
        let vec = SparseVec::from_entries(vec![(5, 1.0), (1, 2.0), (3, 0.0)]);
        let entries: Vec<(u32, f32)> = vec.iter().collect();
        assert_eq!(entries, [(1, 2.0), (5, 1.0)]);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let vec = SparseVec::from_entries(vec![(0, 0.5), (3, 1.5), (9, 2.0)]);
        assert!((cosine(&vec, &vec) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_disjoint_vectors_is_zero() {
        let a = SparseVec::from_entries(vec![(0, 1.0), (2, 1.0)]);
        let b = SparseVec::from_entries(vec![(1, 1.0), (3, 1.0)]);
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero_not_nan() {
        let a = SparseVec::from_entries(vec![(0, 1.0)]);
        let zero = SparseVec::default();
        let score = cosine(&a, &zero);
        assert!(score == 0.0 && !score.is_nan());
    }

    #[test]
    fn cosine_is_never_negative_for_nonnegative_weights() {
        let a = SparseVec::from_entries(vec![(0, 0.1), (1, 3.0)]);
        let b = SparseVec::from_entries(vec![(1, 0.2), (2, 5.0)]);
        let score = cosine(&a, &b);
        assert!((0.0..=1.0).contains(&score));
    }
}
