use thiserror::Error;

/// Errors raised while turning an upload into a [`Workbook`](crate::Workbook).
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unsupported file type: {name} (expected .xlsx, .xls or .csv)")]
    UnsupportedFormat { name: String },

    #[error("File too large: {size} bytes (limit is {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("File is empty: {name}")]
    Empty { name: String },

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while serializing rows for download.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: the filtered view is empty")]
    NothingToExport,

    #[error("Spreadsheet writer error: {0}")]
    Xlsx(String),

    #[error("Row or column index overflow at row {row}, col {col}")]
    IndexOverflow { row: usize, col: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
pub type ExportResult<T> = std::result::Result<T, ExportError>;
