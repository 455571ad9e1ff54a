use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogItem};
use crate::error::RecommendError;
use crate::interactions::{feedback_is_usable, liked_ids, seen_ids};
use crate::table::Table;
use crate::vectorizer::similarity::{mean_and_best_query, score_corpus, score_matrix};
use crate::vectorizer::TfidfVectorizer;

/// Explicit user preferences for content mode. Every field is optional;
/// empty strings mean "no preference".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Item type to filter by (movie/book/game/series/...).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub tags: String,
}

/// Knobs for a content-mode call.
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    /// Desired result size; values below 1 are treated as 1.
    pub count: usize,
    /// Drop items already present in the history source.
    pub exclude_seen: bool,
    /// Drop items with positive feedback.
    pub exclude_liked: bool,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            count: 10,
            exclude_seen: false,
            exclude_liked: false,
        }
    }
}

/// Knobs for a personalized-mode call. Liked items are always excluded
/// from the result; only the seen filter is optional.
#[derive(Debug, Clone)]
pub struct PersonalizedOptions {
    /// Desired result size; values below 1 are treated as 1.
    pub count: usize,
    /// Best-effort: never empties an otherwise non-empty result.
    pub exclude_seen: bool,
}

impl Default for PersonalizedOptions {
    fn default() -> Self {
        Self {
            count: 10,
            exclude_seen: false,
        }
    }
}

/// One ranked result: the original catalog item plus the computed
/// explanation. `warning` is set on every row when the requested type
/// matched nothing and the full catalog was used instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Why a personalized call produced no ranking. These are expected outcomes,
/// not errors: the caller decides the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Catalog source missing or empty.
    NoCatalog,
    /// Feedback source missing or lacking the id/feedback columns.
    NoFeedback,
    /// Feedback present but without a single positive entry.
    NoLikes,
    /// Positive feedback ids share nothing with the catalog ids.
    IdMismatch,
    /// The catalog has no text signal to vectorize.
    NoFeaturableText,
}

impl SkipReason {
    /// Stable string code for the UI boundary.
    pub fn as_code(&self) -> &'static str {
        match self {
            SkipReason::NoCatalog => "NoCatalog",
            SkipReason::NoFeedback => "NoFeedback",
            SkipReason::NoLikes => "NoLikes",
            SkipReason::IdMismatch => "IdMismatch",
            SkipReason::NoFeaturableText => "NoFeaturableText",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Result of a personalized call: either a ranking or the reason there
/// is none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PersonalizedOutcome {
    Ranked(Vec<Recommendation>),
    Skipped(SkipReason),
}

impl PersonalizedOutcome {
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            PersonalizedOutcome::Skipped(reason) => Some(*reason),
            PersonalizedOutcome::Ranked(_) => None,
        }
    }

    pub fn ranked(self) -> Option<Vec<Recommendation>> {
        match self {
            PersonalizedOutcome::Ranked(recs) => Some(recs),
            PersonalizedOutcome::Skipped(_) => None,
        }
    }
}

/// Content-mode recommendation over CSV sources.
///
/// The catalog is required; history and feedback are read best-effort and
/// only when the matching exclusion is requested.
pub fn recommend(
    prefs: &Preferences,
    catalog_path: &Path,
    opts: &RecommendOptions,
    history_path: &Path,
    feedback_path: &Path,
) -> Result<Vec<Recommendation>, RecommendError> {
    let catalog = Table::try_from_csv_path(catalog_path)
        .ok_or_else(|| RecommendError::CatalogUnavailable(catalog_path.display().to_string()))?;
    let history = opts
        .exclude_seen
        .then(|| Table::try_from_csv_path(history_path))
        .flatten();
    let feedback = opts
        .exclude_liked
        .then(|| Table::try_from_csv_path(feedback_path))
        .flatten();
    recommend_from_tables(prefs, &catalog, history.as_ref(), feedback.as_ref(), opts)
}

/// Content-mode recommendation over in-memory tables.
pub fn recommend_from_tables(
    prefs: &Preferences,
    catalog: &Table,
    history: Option<&Table>,
    feedback: Option<&Table>,
    opts: &RecommendOptions,
) -> Result<Vec<Recommendation>, RecommendError> {
    let catalog = Catalog::from_table(catalog)?;

    // Type pre-filter, falling back to the full catalog when nothing matches.
    // The silent broadening is intentional; the warning rides on every row.
    let kind = prefs.kind.trim().to_lowercase();
    let mut warning = None;
    let working: Vec<CatalogItem> = if kind.is_empty() {
        catalog.items().to_vec()
    } else {
        let filtered: Vec<CatalogItem> = catalog
            .items()
            .iter()
            .filter(|item| item.kind.trim().to_lowercase() == kind)
            .cloned()
            .collect();
        if filtered.is_empty() {
            warn!(kind = %kind, "type filter matched nothing; using full catalog");
            warning = Some(format!("Type '{kind}' not found; using full catalog."));
            catalog.items().to_vec()
        } else {
            filtered
        }
    };

    let features: Vec<String> = working.iter().map(CatalogItem::feature_text).collect();
    if features.iter().all(|text| text.trim().is_empty()) {
        return Err(RecommendError::NoFeaturableText);
    }

    let mut vectorizer = TfidfVectorizer::new();
    vectorizer.fit(&features);
    let query = build_query(prefs, &kind, &working);
    debug!(query = %query, candidates = working.len(), "scoring content query");
    let query_vec = vectorizer.transform(&query);
    let corpus = vectorizer.transform_batch(&features);
    let scores = score_corpus(&query_vec, &corpus);

    let liked = if opts.exclude_liked {
        liked_ids(feedback)
    } else {
        HashSet::new()
    };
    let seen = if opts.exclude_seen {
        seen_ids(history)
    } else {
        HashSet::new()
    };

    let query_tokens: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let mut ranked: Vec<(f64, Recommendation)> = working
        .into_iter()
        .zip(features)
        .zip(scores)
        .filter(|((item, _), _)| {
            let id = item.id.trim();
            !liked.contains(id) && !seen.contains(id)
        })
        .map(|((item, feature), score)| {
            let explanation = explain_common_terms(&query_tokens, &feature);
            (
                score,
                Recommendation {
                    item,
                    explanation,
                    warning: warning.clone(),
                },
            )
        })
        .collect();

    // Stable sort: catalog row order is the tie-break.
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(opts.count.max(1));
    Ok(ranked.into_iter().map(|(_, rec)| rec).collect())
}

/// Personalized recommendation over CSV sources.
pub fn recommend_personalized(
    catalog_path: &Path,
    feedback_path: &Path,
    opts: &PersonalizedOptions,
    history_path: &Path,
) -> PersonalizedOutcome {
    let catalog = Table::try_from_csv_path(catalog_path);
    let feedback = Table::try_from_csv_path(feedback_path);
    let history = opts
        .exclude_seen
        .then(|| Table::try_from_csv_path(history_path))
        .flatten();
    recommend_personalized_from_tables(
        catalog.as_ref(),
        feedback.as_ref(),
        history.as_ref(),
        opts,
    )
}

/// Personalized recommendation over in-memory tables.
///
/// The query is implicit: every positively-rated catalog item, transformed
/// in the full-catalog space, mean-aggregated per candidate.
pub fn recommend_personalized_from_tables(
    catalog: Option<&Table>,
    feedback: Option<&Table>,
    history: Option<&Table>,
    opts: &PersonalizedOptions,
) -> PersonalizedOutcome {
    let catalog = match catalog.map(Catalog::from_table) {
        Some(Ok(catalog)) => catalog,
        _ => return PersonalizedOutcome::Skipped(SkipReason::NoCatalog),
    };
    if !feedback_is_usable(feedback) {
        return PersonalizedOutcome::Skipped(SkipReason::NoFeedback);
    }
    let liked = liked_ids(feedback);
    if liked.is_empty() {
        return PersonalizedOutcome::Skipped(SkipReason::NoLikes);
    }
    let liked_items: Vec<&CatalogItem> = catalog
        .items()
        .iter()
        .filter(|item| liked.contains(item.id.trim()))
        .collect();
    if liked_items.is_empty() {
        return PersonalizedOutcome::Skipped(SkipReason::IdMismatch);
    }

    if catalog.has_no_featurable_text() {
        return PersonalizedOutcome::Skipped(SkipReason::NoFeaturableText);
    }

    // Fit on the whole catalog, not the liked subset: candidate scoring
    // needs full vocabulary coverage.
    let features = catalog.feature_texts();
    let mut vectorizer = TfidfVectorizer::new();
    vectorizer.fit(&features);
    let corpus = vectorizer.transform_batch(&features);
    let liked_features: Vec<String> = liked_items
        .iter()
        .map(|item| item.feature_text())
        .collect();
    let queries = vectorizer.transform_batch(&liked_features);
    debug!(
        likes = liked_items.len(),
        candidates = catalog.len(),
        "scoring personalized queries"
    );

    let matrix = score_matrix(&queries, &corpus);
    let collapsed = mean_and_best_query(&matrix);

    let mut ranked: Vec<(f64, Recommendation)> = catalog
        .items()
        .iter()
        .zip(collapsed)
        .map(|(item, (score, best_query))| {
            let explanation = format!("Similar to: {}", liked_items[best_query].title);
            (
                score,
                Recommendation {
                    item: item.clone(),
                    explanation,
                    warning: None,
                },
            )
        })
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    // Already-liked items are never recommended back.
    ranked.retain(|(_, rec)| !liked.contains(rec.item.id.trim()));

    let mut result: Vec<Recommendation> = ranked.into_iter().map(|(_, rec)| rec).collect();
    if opts.exclude_seen {
        let seen = seen_ids(history);
        let unseen: Vec<Recommendation> = result
            .iter()
            .filter(|rec| !seen.contains(rec.item.id.trim()))
            .cloned()
            .collect();
        // Seen-filtering is best-effort: never empty an otherwise viable set.
        if !unseen.is_empty() || result.is_empty() {
            result = unseen;
        }
    }
    result.truncate(opts.count.max(1));
    PersonalizedOutcome::Ranked(result)
}

/// Content-mode query string: joined non-empty preference fields, falling
/// back to the type, then to the first three titles, so the query is never
/// degenerate for a non-empty catalog.
fn build_query(prefs: &Preferences, kind: &str, working: &[CatalogItem]) -> String {
    let joined = [
        prefs.genre.as_str(),
        prefs.theme.as_str(),
        prefs.style.as_str(),
        prefs.context.as_str(),
        prefs.tags.as_str(),
    ]
    .iter()
    .map(|value| value.trim())
    .filter(|value| !value.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
    if !joined.is_empty() {
        return joined;
    }
    if !kind.is_empty() {
        return kind.to_string();
    }
    working
        .iter()
        .take(3)
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Up to three query tokens that literally occur in the item's feature
/// string, in query order, deduplicated.
fn explain_common_terms(query_tokens: &[String], feature_text: &str) -> String {
    let feature_text = feature_text.to_lowercase();
    let item_tokens: HashSet<&str> = feature_text.split_whitespace().collect();
    let mut common: Vec<&str> = Vec::new();
    for token in query_tokens {
        if item_tokens.contains(token.as_str()) && !common.contains(&token.as_str()) {
            common.push(token.as_str());
            if common.len() >= 3 {
                break;
            }
        }
    }
    if common.is_empty() {
        "General content similarity".to_string()
    } else {
        format!("Common terms: {}", common.join(", "))
    }
}
