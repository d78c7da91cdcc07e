use crate::cell::CellValue;
use crate::error::{ExportError, ExportResult, ParseError, ParseResult};
use crate::record::Record;
use crate::sheet::Sheet;
use calamine::{Data, Reader, Xls, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fmt::Display;
use std::io::Cursor;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::text(s),
        Data::DateTime(dt) => {
            // Excel serial date (days since 1899-12-30)
            CellValue::Float(dt.as_f64())
        }
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn spreadsheet_err(e: impl Display) -> ParseError {
    ParseError::Spreadsheet(e.to_string())
}

/// Read every worksheet of an opened calamine workbook, in workbook order
fn read_sheets<'a, R>(mut workbook: R) -> ParseResult<Vec<Sheet>>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: Display,
{
    let mut sheets = Vec::new();

    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(spreadsheet_err)?;

        let grid: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(data_to_cell_value).collect())
            .collect();

        sheets.push(Sheet::from_grid(&sheet_name, grid));
    }

    Ok(sheets)
}

/// Parse an Office Open XML workbook (.xlsx) held in memory
pub fn read_xlsx(bytes: &[u8]) -> ParseResult<Vec<Sheet>> {
    let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(spreadsheet_err)?;
    read_sheets(workbook)
}

/// Parse a legacy BIFF workbook (.xls) held in memory
pub fn read_xls(bytes: &[u8]) -> ParseResult<Vec<Sheet>> {
    let workbook: Xls<_> = Xls::new(Cursor::new(bytes)).map_err(spreadsheet_err)?;
    read_sheets(workbook)
}

fn xlsx_err(e: impl Display) -> ExportError {
    ExportError::Xlsx(e.to_string())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> ExportResult<()> {
    match cell {
        CellValue::Null => {} // Leave empty
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b).map_err(xlsx_err)?;
        }
        CellValue::Int(i) => {
            // Note: Excel stores all numbers as f64, so integers > 2^53
            // may lose precision
            worksheet.write_number(row, col, *i as f64).map_err(xlsx_err)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f).map_err(xlsx_err)?;
        }
        CellValue::String(s) => {
            worksheet.write_string(row, col, s).map_err(xlsx_err)?;
        }
    }
    Ok(())
}

/// Serialize a header row plus records into a single-sheet .xlsx file
pub fn to_xlsx_bytes(sheet_name: &str, headers: &[String], rows: &[&Record]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(xlsx_err)?;

    for (col_idx, header) in headers.iter().enumerate() {
        let col = u16::try_from(col_idx)
            .map_err(|_| ExportError::IndexOverflow { row: 0, col: col_idx })?;
        worksheet.write_string(0, col, header).map_err(xlsx_err)?;
    }

    for (row_idx, record) in rows.iter().enumerate() {
        let row = u32::try_from(row_idx + 1)
            .map_err(|_| ExportError::IndexOverflow { row: row_idx + 1, col: 0 })?;
        for (col_idx, header) in headers.iter().enumerate() {
            let col = u16::try_from(col_idx)
                .map_err(|_| ExportError::IndexOverflow { row: row_idx + 1, col: col_idx })?;
            write_cell(worksheet, row, col, record.get(header))?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}
