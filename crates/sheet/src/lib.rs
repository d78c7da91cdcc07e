//! Spreadsheet data model and file collaborators for tabview
//!
//! Turns uploaded XLSX/XLS/CSV bytes into a [`Workbook`] of [`Sheet`]s whose
//! rows are header-keyed [`Record`]s, and serializes record subsets back to
//! CSV or XLSX for download.
//!
//! # Examples
//!
//! ## Parsing an upload
//!
//! ```
//! use tabview_sheet::{parse, CellValue, Upload, DEFAULT_MAX_UPLOAD_BYTES};
//!
//! let upload = Upload::new("people.csv", b"ID,Name\n1,Alice\n2,Bob\n".to_vec());
//! let book = parse(&upload, DEFAULT_MAX_UPLOAD_BYTES).unwrap();
//!
//! let sheet = book.current_sheet();
//! assert_eq!(sheet.name(), "people");
//! assert_eq!(sheet.headers(), ["ID", "Name"]);
//! assert_eq!(sheet.row(1).unwrap().get("Name"), &CellValue::from("Bob"));
//! ```
//!
//! ## Exporting records
//!
//! ```
//! use tabview_sheet::{serialize, ExportFormat, Sheet};
//!
//! let sheet = Sheet::from_data("S", vec![vec!["ID", "Name"], vec!["1", "Alice"]]);
//! let rows: Vec<_> = sheet.rows().iter().collect();
//!
//! let export = serialize(sheet.headers(), &rows, ExportFormat::Csv).unwrap();
//! assert_eq!(export.file_name, "filtered_data.csv");
//! ```

mod cell;
mod csv;
mod error;
mod export;
mod record;
mod sheet;
mod upload;
mod workbook;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options and codecs.
pub use self::csv::{read_csv, to_csv_bytes, write_csv, CsvOptions};
/// Re-export error types.
pub use error::{ExportError, ExportResult, ParseError, ParseResult};
/// Re-export the exporter collaborator.
pub use export::{serialize, Export, ExportFormat, EXPORT_FILE_STEM, EXPORT_SHEET_NAME};
/// Re-export record type.
pub use record::Record;
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export upload handling.
pub use upload::{check_size, FileFormat, Upload, DEFAULT_MAX_UPLOAD_BYTES};
/// Re-export the workbook and the parser collaborator.
pub use workbook::{parse, Workbook};
/// Re-export XLSX/XLS codecs.
pub use xlsx::{read_xls, read_xlsx, to_xlsx_bytes};
