use std::collections::HashSet;

use tracing::debug;

use crate::table::Table;

/// Feedback values treated as "liked", compared case/whitespace-insensitively.
/// `curtiu`/`positivo` are the values the original feedback logs contain.
pub const POSITIVE_FEEDBACK: &[&str] = &["liked", "like", "positive", "positivo", "curtiu"];

/// Whether a raw feedback value counts as positive.
pub fn is_positive(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    POSITIVE_FEEDBACK.contains(&value.as_str())
}

/// Ids with at least one positive feedback entry.
///
/// An absent table, or one without `id`/`feedback` columns, yields the empty
/// set: exclusion and seeding are best-effort, never a failure.
pub fn liked_ids(feedback: Option<&Table>) -> HashSet<String> {
    let Some(table) = feedback else {
        return HashSet::new();
    };
    if !(table.has_column("id") && table.has_column("feedback")) {
        debug!("feedback source lacks id/feedback columns; ignoring");
        return HashSet::new();
    }
    let mut ids = HashSet::new();
    for row in 0..table.row_count() {
        let value = table.get(row, "feedback").unwrap_or("");
        if is_positive(value) {
            if let Some(id) = table.get(row, "id") {
                ids.insert(id.trim().to_string());
            }
        }
    }
    ids
}

/// Ids present in the history table, regardless of any feedback value.
/// Absent table or missing `id` column yields the empty set.
pub fn seen_ids(history: Option<&Table>) -> HashSet<String> {
    let Some(table) = history else {
        return HashSet::new();
    };
    let Some(values) = table.column_values("id") else {
        debug!("history source lacks an id column; ignoring");
        return HashSet::new();
    };
    values
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when the feedback table has the columns personalized mode requires.
pub fn feedback_is_usable(feedback: Option<&Table>) -> bool {
    feedback.is_some_and(|table| table.has_column("id") && table.has_column("feedback"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback_table(rows: &[(&str, &str)]) -> Table {
        let mut table = Table::new(&["id", "titulo", "feedback"]);
        for (id, value) in rows {
            table.push_row(vec![id, "", value]);
        }
        table
    }

    #[test]
    fn positive_synonyms_are_case_and_whitespace_insensitive() {
        assert!(is_positive("curtiu"));
        assert!(is_positive("  Liked "));
        assert!(is_positive("POSITIVO"));
        assert!(!is_positive("nao_curtiu"));
        assert!(!is_positive(""));
    }

    #[test]
    fn liked_ids_keeps_only_positive_entries() {
        let table = feedback_table(&[("1", "curtiu"), ("2", "nao_curtiu"), ("3", "like")]);
        let ids = liked_ids(Some(&table));
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("1"));
        assert!(ids.contains("3"));
    }

    #[test]
    fn absent_or_malformed_feedback_yields_no_ids() {
        assert!(liked_ids(None).is_empty());
        let mut no_feedback_col = Table::new(&["id", "titulo"]);
        no_feedback_col.push_row(vec!["1", "Duna"]);
        assert!(liked_ids(Some(&no_feedback_col)).is_empty());
        assert!(!feedback_is_usable(Some(&no_feedback_col)));
    }

    #[test]
    fn seen_ids_ignores_feedback_values() {
        let mut table = Table::new(&["id", "titulo"]);
        table.push_row(vec!["7", "Duna"]);
        table.push_row(vec![" 8 ", "Solaris"]);
        table.push_row(vec!["", ""]);
        let ids = seen_ids(Some(&table));
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("7"));
        assert!(ids.contains("8"));
    }

    #[test]
    fn history_without_id_column_is_ignored() {
        let mut table = Table::new(&["titulo"]);
        table.push_row(vec!["Duna"]);
        assert!(seen_ids(Some(&table)).is_empty());
    }
}
