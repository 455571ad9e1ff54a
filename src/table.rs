use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

/// In-memory tabular data with normalized column names.
///
/// Column names are trimmed and lowercased on construction, so lookups are
/// case/whitespace-insensitive. Every cell is a string; there is no typed
/// column support because all sources are flat text records.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// normalized column name -> column index, in source order
    columns: IndexMap<String, usize>,
    rows: Vec<Vec<String>>,
}

/// Normalize a column name the same way for headers and lookups.
fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Table {
    /// Create an empty table with the given header.
    /// Duplicate names keep the first occurrence, like a CSV header would.
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut map = IndexMap::new();
        for (idx, name) in columns.iter().enumerate() {
            map.entry(normalize_column(name.as_ref())).or_insert(idx);
        }
        Self {
            columns: map,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty strings so that every
    /// column index stays addressable; extra cells are kept but unreachable.
    pub fn push_row<S: Into<String>>(&mut self, row: Vec<S>) {
        let width = self
            .columns
            .values()
            .copied()
            .max()
            .map_or(0, |max| max + 1);
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() < width {
            row.resize(width, String::new());
        }
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(&normalize_column(name))
    }

    /// Get one cell, or `None` when the column does not exist.
    /// A row shorter than the header yields `""` for the missing cells.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let &idx = self.columns.get(&normalize_column(column))?;
        let row = self.rows.get(row)?;
        Some(row.get(idx).map_or("", String::as_str))
    }

    /// Iterate one column top to bottom. `None` when the column is absent.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let &idx = self.columns.get(&normalize_column(name))?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(idx).map_or("", String::as_str)),
        )
    }

    /// Read a CSV file, best effort.
    ///
    /// Returns `None` when the file is missing, empty, unreadable, or not
    /// parseable as CSV. Optional sources (history, feedback) go through this
    /// so that a broken side file can never fail a recommendation call.
    pub fn try_from_csv_path(path: &Path) -> Option<Table> {
        match fs::metadata(path) {
            Ok(meta) if meta.len() > 0 => {}
            _ => return None,
        }
        let mut reader = match csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
        {
            Ok(reader) => reader,
            Err(err) => {
                debug!(path = %path.display(), %err, "failed to open csv source");
                return None;
            }
        };
        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(err) => {
                debug!(path = %path.display(), %err, "failed to read csv header");
                return None;
            }
        };
        let mut table = Table::new(&headers.iter().collect::<Vec<_>>());
        for record in reader.records() {
            match record {
                Ok(record) => {
                    table.push_row(record.iter().map(str::to_string).collect::<Vec<String>>());
                }
                Err(err) => {
                    debug!(path = %path.display(), %err, "skipping unreadable csv record");
                    return None;
                }
            }
        }
        Some(table)
    }
}
