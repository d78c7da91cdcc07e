use crate::cell::CellValue;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// One worksheet: a header row plus the data records built from it.
///
/// Sheets are immutable once parsed; views over them (filtering, paging)
/// borrow the records instead of rebuilding them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Record>,
}

impl Sheet {
    /// Create a sheet from already-built parts
    #[must_use]
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Record>) -> Self {
        Sheet {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Build a sheet from a raw cell grid whose first row holds the headers.
    ///
    /// Blank header cells are named `Column{n}` (1-based) so their data is
    /// still reachable.
    #[must_use]
    pub fn from_grid(name: &str, grid: Vec<Vec<CellValue>>) -> Self {
        let mut grid = grid.into_iter();
        let Some(header_row) = grid.next() else {
            return Sheet::new(name, Vec::new(), Vec::new());
        };

        let headers: Vec<String> = header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = cell.as_str();
                if text.trim().is_empty() {
                    format!("Column{}", i + 1)
                } else {
                    text
                }
            })
            .collect();

        let rows = grid
            .map(|cells| Record::from_cells(&headers, &cells))
            .collect();

        Sheet::new(name, headers, rows)
    }

    /// Build a sheet from literal data, first row as headers
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(name: &str, data: Vec<Vec<T>>) -> Self {
        let grid: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::from_grid(name, grid)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column headers in file order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data records in file order
    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Get a record by position
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Record> {
        self.rows.get(index)
    }

    /// Number of data rows (header excluded)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }
}
