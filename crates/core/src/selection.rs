//! The record shown in the detail view.

use serde::{Deserialize, Serialize};
use tabview_sheet::{CellValue, Record};

/// A copy of one row taken when the user selected it.
///
/// The data is owned, so later store changes never alter what the detail
/// view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedRecord {
    /// Copy of the row's fields
    pub data: Record,
    /// Position in the filtered view at selection time
    pub row_index: usize,
    /// Position in the sheet
    pub source_index: usize,
    /// Sheet that was active at selection time
    pub sheet_name: String,
}

impl SelectedRecord {
    /// `(header, value)` pairs in header order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.data.iter()
    }

    /// `header: value` lines, one per field
    #[must_use]
    pub fn to_text(&self) -> String {
        self.entries()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
