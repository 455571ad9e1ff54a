use thiserror::Error;

/// Errors surfaced by the recommendation entry points.
///
/// Only the catalog is a required input. Optional sources (history, feedback)
/// never produce an error here; they degrade to "no data" instead.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The catalog source is missing, empty on disk, or unreadable.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The catalog parsed but contains zero rows.
    #[error("catalog has no rows")]
    EmptyCatalog,

    /// Every feature string in the corpus is empty after concatenation,
    /// so there is nothing to vectorize.
    #[error("catalog has no usable text to vectorize")]
    NoFeaturableText,
}
