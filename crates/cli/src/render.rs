//! Terminal rendering of pages, records and workbook summaries.

use anyhow::Result;
use arrow::array::{ArrayRef, RecordBatch, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::util::pretty::pretty_format_batches;
use colored::Colorize;
use std::sync::Arc;
use tabview_core::{PageInfo, SelectedRecord, TabularStore};
use tabview_sheet::{write_csv, CsvOptions, Record};

/// Output format for rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Pretty table output (default)
    #[default]
    Table,
}

/// Build an Arrow batch of string columns, led by a 1-based `#` column.
pub fn rows_to_batch(headers: &[String], rows: &[&Record], first_number: usize) -> Result<RecordBatch> {
    let mut fields = vec![Field::new("#", DataType::UInt64, false)];
    fields.extend(headers.iter().map(|h| Field::new(h, DataType::Utf8, true)));
    let schema = Arc::new(Schema::new(fields));

    let numbers: UInt64Array = (0..rows.len())
        .map(|i| (first_number + i) as u64)
        .collect();
    let mut columns: Vec<ArrayRef> = vec![Arc::new(numbers)];
    for header in headers {
        let values: StringArray = rows
            .iter()
            .map(|row| {
                let value = row.get(header);
                (!value.is_null()).then(|| value.as_str())
            })
            .collect();
        columns.push(Arc::new(values));
    }

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Convert records to JSON objects holding only the given headers.
pub fn rows_to_json(headers: &[String], rows: &[&Record]) -> Result<serde_json::Value> {
    let objects = rows
        .iter()
        .map(|row| {
            let projected: Record = headers
                .iter()
                .map(|h| (h.clone(), row.get(h).clone()))
                .collect();
            serde_json::to_value(projected)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::Value::Array(objects))
}

/// Print records in the requested format. `first_number` is the 1-based
/// position of the first row within the filtered view.
pub fn print_rows(
    headers: &[String],
    rows: &[&Record],
    first_number: usize,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if headers.is_empty() || rows.is_empty() {
                println!("{}", "(no rows)".dimmed());
                return Ok(());
            }
            let batch = rows_to_batch(headers, rows, first_number)?;
            println!("{}", pretty_format_batches(&[batch])?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows_to_json(headers, rows)?)?);
        }
        OutputFormat::Csv => {
            write_csv(std::io::stdout().lock(), headers, rows, &CsvOptions::default())?;
        }
    }
    Ok(())
}

/// Paginator footer, e.g. `Rows 11-20 of 42 (page 2/5)`.
pub fn page_footer(info: &PageInfo) -> String {
    format!(
        "Rows {}-{} of {} (page {}/{}, {} per page)",
        info.first_item(),
        info.last_item(),
        info.total_items,
        info.current_page + 1,
        info.page_count.max(1),
        info.page_size
    )
}

/// Print the current page of the store with its footer.
pub fn print_page(store: &TabularStore, format: OutputFormat) -> Result<()> {
    let rows = store.current_page_rows();
    let info = store.page_info();
    print_rows(store.visible_columns(), &rows, info.first_item().max(1), format)?;
    if format == OutputFormat::Table {
        println!("{}", page_footer(&info).dimmed());
    }
    Ok(())
}

/// Print the sheet list, marking the active sheet.
pub fn print_sheets(store: &TabularStore) {
    let Some(workbook) = store.workbook() else {
        println!("{}", "No file loaded".yellow());
        return;
    };
    println!("{} {}", "File:".cyan().bold(), workbook.name());
    for (i, sheet) in workbook.sheets().enumerate() {
        let marker = if i == workbook.selected_sheet_index() { "*" } else { " " };
        println!(
            " {marker} {}. {} ({} rows, {} columns)",
            i + 1,
            sheet.name(),
            sheet.row_count(),
            sheet.col_count()
        );
    }
}

/// Print the selected record's fields, one per line.
pub fn print_record(record: Option<&SelectedRecord>, format: OutputFormat) -> Result<()> {
    let Some(record) = record else {
        println!("{}", "No record selected".yellow());
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Table | OutputFormat::Csv => {
            println!(
                "{} {} #{}",
                "Record".cyan().bold(),
                record.sheet_name,
                record.source_index + 1
            );
            for (key, value) in record.entries() {
                println!("  {}: {}", key.bold(), value);
            }
        }
    }
    Ok(())
}

/// Print the active sheet's columns, marking hidden ones.
pub fn print_columns(store: &TabularStore) {
    let Some(sheet) = store.current_sheet() else {
        println!("{}", "No file loaded".yellow());
        return;
    };
    for header in sheet.headers() {
        let shown = store.visible_columns().contains(header);
        let filter = store
            .filters()
            .column_filters
            .get(header)
            .map(|f| format!(" [filter: {f}]"))
            .unwrap_or_default();
        if shown {
            println!("  {header}{filter}");
        } else {
            println!("  {}{filter}", format!("{header} (hidden)").dimmed());
        }
    }
}
