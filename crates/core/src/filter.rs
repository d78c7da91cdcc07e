//! Search and per-column filter criteria.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabview_sheet::Record;

/// Active filter state: a global search text plus per-column filters.
///
/// All tests are case-insensitive substring matches against the string form
/// of a cell, and every non-empty criterion must hold (AND).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub column_filters: IndexMap<String, String>,
}

/// A partial update to [`FilterCriteria`].
///
/// `None` search text leaves the current one untouched; each column entry
/// replaces its previous value, and an empty value removes the column filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub search_text: Option<String>,
    pub column_filters: IndexMap<String, String>,
}

impl FilterUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update that only changes the search text
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self::new().with_search(text)
    }

    /// Update that only changes one column filter
    #[must_use]
    pub fn column(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().with_column(header, value)
    }

    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_column(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.column_filters.insert(header.into(), value.into());
        self
    }
}

impl FilterCriteria {
    /// True when no criterion would exclude a row
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.column_filters.values().all(String::is_empty)
    }

    /// Shallow-merge an update into these criteria
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(text) = update.search_text {
            self.search_text = text;
        }
        for (header, value) in update.column_filters {
            if value.is_empty() {
                self.column_filters.shift_remove(&header);
            } else {
                self.column_filters.insert(header, value);
            }
        }
    }

    /// Lowercase every criterion once, for filtering many rows
    #[must_use]
    pub fn matcher(&self) -> Matcher {
        Matcher {
            search: self.search_text.to_lowercase(),
            columns: self
                .column_filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(header, value)| (header.clone(), value.to_lowercase()))
                .collect(),
        }
    }

    /// Keep the rows matching these criteria, paired with their position in
    /// `rows`. Order is preserved.
    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [Record]) -> Vec<(usize, &'a Record)> {
        let matcher = self.matcher();
        rows.iter()
            .enumerate()
            .filter(|(_, record)| matcher.matches(record))
            .collect()
    }
}

/// Pre-lowercased form of [`FilterCriteria`].
#[derive(Debug, Clone)]
pub struct Matcher {
    search: String,
    columns: Vec<(String, String)>,
}

impl Matcher {
    /// Test one record. Missing columns compare as the empty string.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if !self.search.is_empty() && !record.any_field_contains(&self.search) {
            return false;
        }
        self.columns
            .iter()
            .all(|(header, needle)| record.get(header).contains_lowercase(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabview_sheet::{CellValue, Sheet};

    fn sheet() -> Sheet {
        Sheet::from_grid(
            "People",
            vec![
                vec!["ID".into(), "Name".into(), "City".into()],
                vec![CellValue::Int(1), "Alice".into(), "Madrid".into()],
                vec![CellValue::Int(2), "Bob".into(), "Barcelona".into()],
                vec![CellValue::Int(12), "ALICIA".into(), CellValue::Null],
            ],
        )
    }

    fn ids(rows: &[(usize, &Record)]) -> Vec<usize> {
        rows.iter().map(|(i, _)| *i).collect()
    }

    #[test]
    fn test_empty_criteria_keep_everything() {
        let sheet = sheet();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(ids(&criteria.apply(sheet.rows())), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let sheet = sheet();
        let mut criteria = FilterCriteria::default();

        criteria.merge(FilterUpdate::search("alic"));
        assert_eq!(ids(&criteria.apply(sheet.rows())), vec![0, 2]);

        criteria.merge(FilterUpdate::search("BARCE"));
        assert_eq!(ids(&criteria.apply(sheet.rows())), vec![1]);

        // numbers are searched by their string form
        criteria.merge(FilterUpdate::search("2"));
        assert_eq!(ids(&criteria.apply(sheet.rows())), vec![1, 2]);
    }

    #[test]
    fn test_column_filters_are_anded() {
        let sheet = sheet();
        let mut criteria = FilterCriteria::default();

        criteria.merge(FilterUpdate::column("Name", "ali").with_column("City", "mad"));
        assert_eq!(ids(&criteria.apply(sheet.rows())), vec![0]);
    }

    #[test]
    fn test_search_and_columns_combine() {
        let sheet = sheet();
        let mut criteria = FilterCriteria::default();

        criteria.merge(FilterUpdate::search("a").with_column("ID", "1"));
        assert_eq!(ids(&criteria.apply(sheet.rows())), vec![0, 2]);
    }

    #[test]
    fn test_missing_column_compares_as_empty() {
        let sheet = sheet();
        let mut criteria = FilterCriteria::default();

        criteria.merge(FilterUpdate::column("Phone", "5"));
        assert!(criteria.apply(sheet.rows()).is_empty());

        // "undefined" is not the string form of a missing value
        criteria.merge(FilterUpdate::column("Phone", "undefined"));
        assert!(criteria.apply(sheet.rows()).is_empty());
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut criteria = FilterCriteria::default();
        criteria.merge(FilterUpdate::search("x").with_column("A", "1").with_column("B", "2"));
        criteria.merge(FilterUpdate::column("A", "9"));

        assert_eq!(criteria.search_text, "x");
        assert_eq!(criteria.column_filters.get("A").map(String::as_str), Some("9"));
        assert_eq!(criteria.column_filters.get("B").map(String::as_str), Some("2"));

        criteria.merge(FilterUpdate::column("B", ""));
        assert!(!criteria.column_filters.contains_key("B"));
        assert!(!criteria.is_empty());

        criteria.merge(FilterUpdate::search("").with_column("A", ""));
        assert!(criteria.is_empty());
    }
}
