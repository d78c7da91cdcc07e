use crate::cell::CellValue;
use crate::error::{ExportResult, ParseResult};
use crate::record::Record;
use crate::sheet::Sheet;
use std::io::{Read, Write};

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
        }
    }
}

/// Read CSV text into a single sheet; the first record is the header row.
///
/// Every cell is kept as text. Ragged rows are accepted and invalid UTF-8
/// is replaced rather than rejected.
pub fn read_csv<R: Read>(reader: R, sheet_name: &str, options: &CsvOptions) -> ParseResult<Sheet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false) // headers are handled by Sheet::from_grid
        .flexible(true)
        .from_reader(reader);

    let mut grid: Vec<Vec<CellValue>> = Vec::new();

    for result in csv_reader.byte_records() {
        let record = result?;
        let row: Vec<CellValue> = record
            .iter()
            .map(|field| CellValue::text(&String::from_utf8_lossy(field)))
            .collect();
        grid.push(row);
    }

    Ok(Sheet::from_grid(sheet_name, grid))
}

/// Write a header row followed by the given records as CSV
pub fn write_csv<W: Write>(
    writer: W,
    headers: &[String],
    rows: &[&Record],
    options: &CsvOptions,
) -> ExportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .from_writer(writer);

    csv_writer.write_record(headers)?;
    for row in rows {
        let record: Vec<String> = headers.iter().map(|h| row.get(h).as_str()).collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize records to CSV bytes
pub fn to_csv_bytes(headers: &[String], rows: &[&Record], options: &CsvOptions) -> ExportResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, headers, rows, options)?;
    Ok(buffer)
}
