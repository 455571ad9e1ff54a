use rayon::prelude::*;

use super::sparse::{cosine, SparseVec};

/// Cosine score of one query against every corpus vector, in corpus order.
pub fn score_corpus(query: &SparseVec, corpus: &[SparseVec]) -> Vec<f64> {
    corpus.par_iter().map(|doc| cosine(query, doc)).collect()
}

/// Score matrix for several queries: `result[q][d]` is the similarity of
/// query `q` to corpus vector `d`.
pub fn score_matrix(queries: &[SparseVec], corpus: &[SparseVec]) -> Vec<Vec<f64>> {
    queries
        .iter()
        .map(|query| score_corpus(query, corpus))
        .collect()
}

/// Collapse a multi-query score matrix per corpus item.
///
/// Returns, for each corpus vector, the arithmetic mean across queries and
/// the index of the best-scoring query. Ties keep the lowest query index.
pub fn mean_and_best_query(matrix: &[Vec<f64>]) -> Vec<(f64, usize)> {
    let n_queries = matrix.len();
    if n_queries == 0 {
        return Vec::new();
    }
    let n_corpus = matrix[0].len();
    (0..n_corpus)
        .map(|doc| {
            let mut sum = 0.0;
            let mut best = 0usize;
            let mut best_score = f64::NEG_INFINITY;
            for (query, row) in matrix.iter().enumerate() {
                let score = row[doc];
                sum += score;
                if score > best_score {
                    best_score = score;
                    best = query;
                }
            }
            (sum / n_queries as f64, best)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(entries: &[(u32, f32)]) -> SparseVec {
        SparseVec::from_entries(entries.to_vec())
    }

    #[test]
    fn score_corpus_preserves_order() {
        let query = vec_of(&[(0, 1.0)]);
        let corpus = vec![
            vec_of(&[(1, 1.0)]),
            vec_of(&[(0, 1.0)]),
            vec_of(&[(0, 1.0), (1, 1.0)]),
        ];
        let scores = score_corpus(&query, &corpus);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], 0.0);
        assert!((scores[1] - 1.0).abs() < 1e-6);
        assert!(scores[2] > 0.0 && scores[2] < 1.0);
    }

    #[test]
    fn mean_is_arithmetic_over_queries() {
        let queries = vec![vec_of(&[(0, 1.0)]), vec_of(&[(1, 1.0)])];
        let corpus = vec![vec_of(&[(0, 1.0)])];
        let matrix = score_matrix(&queries, &corpus);
        let collapsed = mean_and_best_query(&matrix);
        // query 0 scores 1.0, query 1 scores 0.0
        assert!((collapsed[0].0 - 0.5).abs() < 1e-6);
        assert_eq!(collapsed[0].1, 0);
    }

    #[test]
    fn best_query_ties_keep_lowest_index() {
        let queries = vec![vec_of(&[(0, 1.0)]), vec_of(&[(0, 1.0)])];
        let corpus = vec![vec_of(&[(0, 3.0)])];
        let matrix = score_matrix(&queries, &corpus);
        // identical queries, identical scores
        let collapsed = mean_and_best_query(&matrix);
        assert_eq!(collapsed[0].1, 0);
    }

    #[test]
    fn empty_query_set_collapses_to_nothing() {
        assert!(mean_and_best_query(&[]).is_empty());
    }
}
