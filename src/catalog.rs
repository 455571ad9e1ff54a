use serde::{Deserialize, Serialize};

use crate::error::RecommendError;
use crate::table::Table;

/// Column synonyms accepted for each text field, in lookup order.
/// The Portuguese names are what the catalogs this engine grew up with use;
/// the English names are accepted equivalents.
const FIELD_COLUMNS: [(&str, &[&str]); 8] = [
    ("title", &["titulo", "title"]),
    ("type", &["tipo", "type"]),
    ("genre", &["genero", "genre"]),
    ("theme", &["tema", "theme"]),
    ("style", &["estilo", "style"]),
    ("context", &["contexto", "context"]),
    ("tags", &["tags"]),
    ("description", &["descricao", "description"]),
];

/// One normalized catalog record.
///
/// Every field is always present; absent source columns are backfilled with
/// empty strings before any scoring logic runs. `kind` is the open item-type
/// enumeration (movie/book/game/series/...) kept as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub genre: String,
    pub theme: String,
    pub style: String,
    pub context: String,
    pub tags: String,
    pub description: String,
}

impl CatalogItem {
    /// The feature string this item is compared by: all text fields joined
    /// with single spaces, in fixed field order, trimmed.
    pub fn feature_text(&self) -> String {
        let joined = [
            self.title.as_str(),
            self.kind.as_str(),
            self.genre.as_str(),
            self.theme.as_str(),
            self.style.as_str(),
            self.context.as_str(),
            self.tags.as_str(),
            self.description.as_str(),
        ]
        .join(" ");
        joined.trim().to_string()
    }
}

/// A normalized catalog: the single point where loosely-shaped tabular input
/// becomes the strict internal record shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Normalize a raw table into catalog items.
    ///
    /// Missing text columns become empty fields. A missing `id` column is
    /// synthesized as sequential row positions starting at `"1"`.
    pub fn from_table(table: &Table) -> Result<Catalog, RecommendError> {
        if table.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }
        let has_id = table.has_column("id");
        let mut items = Vec::with_capacity(table.row_count());
        for row in 0..table.row_count() {
            let field = |synonyms: &[&str]| -> String {
                synonyms
                    .iter()
                    .find_map(|name| table.get(row, name))
                    .unwrap_or("")
                    .to_string()
            };
            let id = if has_id {
                table.get(row, "id").unwrap_or("").to_string()
            } else {
                (row + 1).to_string()
            };
            items.push(CatalogItem {
                id,
                title: field(FIELD_COLUMNS[0].1),
                kind: field(FIELD_COLUMNS[1].1),
                genre: field(FIELD_COLUMNS[2].1),
                theme: field(FIELD_COLUMNS[3].1),
                style: field(FIELD_COLUMNS[4].1),
                context: field(FIELD_COLUMNS[5].1),
                tags: field(FIELD_COLUMNS[6].1),
                description: field(FIELD_COLUMNS[7].1),
            });
        }
        Ok(Catalog { items })
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Feature string per item, in catalog row order.
    pub fn feature_texts(&self) -> Vec<String> {
        self.items.iter().map(CatalogItem::feature_text).collect()
    }

    /// True when no item carries any text signal at all.
    pub fn has_no_featurable_text(&self) -> bool {
        self.items
            .iter()
            .all(|item| item.feature_text().trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row.to_vec());
        }
        table
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = table(&["titulo"], &[]);
        assert!(matches!(
            Catalog::from_table(&table),
            Err(RecommendError::EmptyCatalog)
        ));
    }

    #[test]
    fn missing_columns_are_backfilled() {
        let table = table(&["titulo"], &[&["Duna"]]);
        let catalog = Catalog::from_table(&table).unwrap();
        let item = &catalog.items()[0];
        assert_eq!(item.title, "Duna");
        assert_eq!(item.genre, "");
        assert_eq!(item.description, "");
    }

    #[test]
    fn ids_are_synthesized_from_row_position() {
        let table = table(&["titulo"], &[&["Duna"], &["Solaris"]]);
        let catalog = Catalog::from_table(&table).unwrap();
        assert_eq!(catalog.items()[0].id, "1");
        assert_eq!(catalog.items()[1].id, "2");
    }

    #[test]
    fn existing_ids_pass_through_as_strings() {
        let table = table(&["id", "titulo"], &[&["42", "Duna"]]);
        let catalog = Catalog::from_table(&table).unwrap();
        assert_eq!(catalog.items()[0].id, "42");
    }

    #[test]
    fn english_and_portuguese_columns_are_equivalent() {
        let pt = table(
            &["titulo", "tipo", "genero"],
            &[&["Duna", "filme", "Sci-Fi"]],
        );
        let en = table(&["title", "type", "genre"], &[&["Duna", "filme", "Sci-Fi"]]);
        let pt = Catalog::from_table(&pt).unwrap();
        let en = Catalog::from_table(&en).unwrap();
        assert_eq!(pt.items()[0], en.items()[0]);
    }

    #[test]
    fn feature_text_joins_all_fields_and_trims() {
        let table = table(
            &["titulo", "tipo", "genero", "tags"],
            &[&["Duna", "filme", "Sci-Fi", "deserto; especiaria"]],
        );
        let catalog = Catalog::from_table(&table).unwrap();
        assert_eq!(
            catalog.feature_texts()[0],
            "Duna filme Sci-Fi    deserto; especiaria"
        );
    }

    #[test]
    fn blank_catalog_has_no_featurable_text() {
        let table = table(&["titulo", "genero"], &[&["", ""], &["  ", ""]]);
        let catalog = Catalog::from_table(&table).unwrap();
        assert!(catalog.has_no_featurable_text());
    }
}
