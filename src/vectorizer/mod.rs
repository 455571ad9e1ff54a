pub mod similarity;
pub mod sparse;

use std::collections::HashSet;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use sparse::SparseVec;

/// Default vocabulary cap. Small catalogs never get near it, but the cap
/// keeps a pathological catalog from blowing up the term space.
pub const DEFAULT_MAX_FEATURES: usize = 50_000;

/// TF-IDF vectorizer over unigrams and bigrams.
///
/// `fit` learns a vocabulary and IDF weights from a corpus of feature
/// strings; `transform` maps any text into that fitted space. The fit is a
/// pure function of the corpus: same documents in the same order produce the
/// same vocabulary, term indices and weights.
///
/// A fitted space is only meaningful for the corpus it was fit on. Callers
/// own that pairing; transforming against a mismatched fit silently yields
/// meaningless (but well-formed) vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term -> dense index, in selection order
    vocabulary: IndexMap<Box<str>, u32>,
    /// idf weight per term index
    idf: Vec<f32>,
    max_features: usize,
    ngram_range: (usize, usize),
    min_df: u32,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            vocabulary: IndexMap::new(),
            idf: Vec::new(),
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: (1, 2),
            min_df: 1,
        }
    }

    /// Cap the vocabulary size. When the cap binds, terms are kept by highest
    /// corpus frequency, ties broken lexicographically.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features.max(1);
        self
    }

    /// Set the n-gram range, e.g. `(1, 2)` for unigrams plus bigrams.
    #[must_use]
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }

    /// Minimum number of documents a term must appear in to be retained.
    #[must_use]
    pub fn with_min_df(mut self, min_df: u32) -> Self {
        self.min_df = min_df.max(1);
        self
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Learn vocabulary and IDF weights from the corpus.
    ///
    /// An all-empty corpus fits to an empty vocabulary; detecting that as an
    /// error is the caller's concern, not the vectorizer's.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        let n_docs = documents.len() as f64;
        // term -> (corpus count, document frequency), first-occurrence order
        let mut stats: IndexMap<Box<str>, (u64, u32)> = IndexMap::new();
        for doc in documents {
            let terms = self.terms_of(doc.as_ref());
            let mut seen_in_doc: HashSet<&str> = HashSet::new();
            for term in &terms {
                let entry = stats.entry(term.as_str().into()).or_insert((0, 0));
                entry.0 += 1;
                if seen_in_doc.insert(term.as_str()) {
                    entry.1 += 1;
                }
            }
        }

        let min_df = self.min_df;
        let mut selected: Vec<(Box<str>, u64, u32)> = stats
            .into_iter()
            .filter(|&(_, (_, df))| df >= min_df)
            .map(|(term, (count, df))| (term, count, df))
            .collect();
        if selected.len() > self.max_features {
            selected.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            selected.truncate(self.max_features);
        }

        self.vocabulary = IndexMap::with_capacity(selected.len());
        self.idf = Vec::with_capacity(selected.len());
        for (idx, (term, _, df)) in selected.into_iter().enumerate() {
            self.vocabulary.insert(term, idx as u32);
            // smoothed idf, always > 0
            self.idf
                .push((((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0) as f32);
        }
    }

    /// Map a text into the fitted space. Out-of-vocabulary terms contribute
    /// nothing; a text with no known terms becomes the zero vector.
    pub fn transform(&self, text: &str) -> SparseVec {
        let mut counts: IndexMap<u32, u32> = IndexMap::new();
        for term in self.terms_of(text) {
            if let Some(&idx) = self.vocabulary.get(term.as_str()) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }
        SparseVec::from_entries(
            counts
                .into_iter()
                .map(|(idx, count)| (idx, count as f32 * self.idf[idx as usize]))
                .collect(),
        )
    }

    /// Transform a batch of texts in parallel, preserving order.
    pub fn transform_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<SparseVec> {
        texts
            .par_iter()
            .map(|text| self.transform(text.as_ref()))
            .collect()
    }

    /// All n-gram terms of a text, lowercased, in occurrence order.
    fn terms_of(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        let mut terms = Vec::new();
        for n in self.ngram_range.0..=self.ngram_range.1 {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

/// Split into lowercased alphanumeric runs, dropping single-character tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}
