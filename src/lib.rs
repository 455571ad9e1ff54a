//! Content-based recommendation engine for small cultural catalogs
//! (movies, books, games, series).
//!
//! Free-text item records are normalized into a fixed schema, concatenated
//! into per-item feature strings, vectorized with a TF-IDF model (unigrams
//! plus bigrams) and ranked by cosine similarity against either an explicit
//! preference query ("content" mode) or the set of previously liked items
//! ("personalized" mode).
//!
//! Every call is self-contained: it loads its sources, fits a fresh vector
//! space, scores, and returns. Nothing is cached or shared between calls,
//! so concurrent callers cannot interfere.

pub mod catalog;
pub mod error;
pub mod interactions;
pub mod recommend;
pub mod table;
pub mod vectorizer;

/// One normalized catalog record: seven text fields plus a string id,
/// all guaranteed present (possibly empty) after normalization.
pub use catalog::{Catalog, CatalogItem};

/// Error taxonomy for the required catalog input. Optional sources never
/// error; they degrade to "no data".
pub use error::RecommendError;

/// In-memory tabular source with case/whitespace-insensitive column names.
/// CSV loading is best-effort for optional sources.
pub use table::Table;

/// TF-IDF feature space: fit on a corpus of feature strings, transform any
/// text into it. Fresh per recommendation call.
pub use vectorizer::TfidfVectorizer;

/// Content-mode entry points and their option/result types.
pub use recommend::{
    recommend, recommend_from_tables, Preferences, Recommendation, RecommendOptions,
};

/// Personalized-mode entry points. A call either ranks candidates or
/// reports a `SkipReason` string code; absence of likes is an expected
/// outcome, not an error.
pub use recommend::{
    recommend_personalized, recommend_personalized_from_tables, PersonalizedOptions,
    PersonalizedOutcome, SkipReason,
};
