use crate::csv::{to_csv_bytes, CsvOptions};
use crate::error::{ExportError, ExportResult};
use crate::record::Record;
use crate::upload::FileFormat;
use crate::xlsx::to_xlsx_bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Worksheet name used for exported rows
pub const EXPORT_SHEET_NAME: &str = "Filtered Data";

/// Base file name suggested for exports
pub const EXPORT_FILE_STEM: &str = "filtered_data";

/// Output formats for exported rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// Export format matching the family of the uploaded file
    #[must_use]
    pub fn for_source(format: FileFormat) -> Self {
        match format {
            FileFormat::Csv => ExportFormat::Csv,
            FileFormat::Xlsx | FileFormat::Xls => ExportFormat::Xlsx,
        }
    }

    /// Format from a target path's extension
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    /// Suggested download name, e.g. `filtered_data.xlsx`
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{EXPORT_FILE_STEM}.{}", self.extension())
    }
}

/// Serialized rows ready to be handed to the user
#[derive(Debug, Clone)]
pub struct Export {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

/// Serialize rows under the given headers. An empty row set is refused.
pub fn serialize(headers: &[String], rows: &[&Record], format: ExportFormat) -> ExportResult<Export> {
    if rows.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let bytes = match format {
        ExportFormat::Csv => to_csv_bytes(headers, rows, &CsvOptions::default())?,
        ExportFormat::Xlsx => to_xlsx_bytes(EXPORT_SHEET_NAME, headers, rows)?,
    };

    Ok(Export {
        file_name: format.file_name(),
        format,
        bytes,
        row_count: rows.len(),
    })
}
