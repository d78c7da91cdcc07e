//! Error types for the tabular store.

use tabview_sheet::{ExportError, ParseError};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by [`TabularStore`](crate::TabularStore) operations.
///
/// None of these are fatal: the store keeps its last valid state whenever
/// one is returned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The upload could not be read as a workbook.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The filtered rows could not be serialized.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Page size must be at least one row.
    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(usize),
}

impl StoreError {
    /// True for errors raised while loading a file.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// True for errors raised while exporting.
    pub fn is_export(&self) -> bool {
        matches!(self, Self::Export(_))
    }
}
