use crate::csv::{read_csv, CsvOptions};
use crate::error::{ParseError, ParseResult};
use crate::sheet::Sheet;
use crate::upload::{FileFormat, Upload};
use crate::xlsx::{read_xls, read_xlsx};
use indexmap::IndexMap;

/// A parsed spreadsheet file: an ordered set of sheets and the active one.
///
/// A workbook always holds at least one sheet, so the selected index is
/// always valid.
#[derive(Debug, Clone)]
pub struct Workbook {
    name: String,
    format: FileFormat,
    sheets: IndexMap<String, Sheet>,
    selected_sheet_index: usize,
}

impl Workbook {
    /// Assemble a workbook from parsed sheets, selecting the first one.
    ///
    /// Sheets sharing a name keep only the first occurrence.
    pub fn new(name: &str, format: FileFormat, sheets: Vec<Sheet>) -> ParseResult<Self> {
        let mut by_name = IndexMap::with_capacity(sheets.len());
        for sheet in sheets {
            by_name.entry(sheet.name().to_string()).or_insert(sheet);
        }
        if by_name.is_empty() {
            return Err(ParseError::NoSheets);
        }

        Ok(Workbook {
            name: name.to_string(),
            format,
            sheets: by_name,
            selected_sheet_index: 0,
        })
    }

    /// File name the workbook was loaded from
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format the workbook was parsed from
    #[must_use]
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Iterate sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }

    /// Get a sheet by index (0-based)
    #[must_use]
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get_index(index).map(|(_, sheet)| sheet)
    }

    /// Get a sheet by name
    #[must_use]
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Position of a sheet by name
    #[must_use]
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.get_index_of(name)
    }

    #[must_use]
    pub fn selected_sheet_index(&self) -> usize {
        self.selected_sheet_index
    }

    /// The active sheet
    #[must_use]
    pub fn current_sheet(&self) -> &Sheet {
        // selected_sheet_index is kept in bounds and sheets is never empty
        &self.sheets[self.selected_sheet_index]
    }

    /// Make the sheet at `index` active. Out-of-range indices are ignored.
    ///
    /// Returns whether the index was accepted.
    pub fn select_sheet(&mut self, index: usize) -> bool {
        if index >= self.sheets.len() {
            return false;
        }
        self.selected_sheet_index = index;
        true
    }
}

/// Parse an upload into a workbook.
///
/// Validates the size against `max_bytes` and the file type, then decodes
/// XLSX/XLS with calamine or CSV with the csv reader. CSV uploads become a
/// single sheet named after the file.
pub fn parse(upload: &Upload, max_bytes: usize) -> ParseResult<Workbook> {
    let format = upload.validate(max_bytes)?;

    let sheets = match format {
        FileFormat::Xlsx => read_xlsx(upload.bytes())?,
        FileFormat::Xls => read_xls(upload.bytes())?,
        FileFormat::Csv => {
            let sheet_name = upload.stem().unwrap_or("Sheet1");
            vec![read_csv(upload.bytes(), sheet_name, &CsvOptions::default())?]
        }
    };

    Workbook::new(upload.name(), format, sheets)
}
