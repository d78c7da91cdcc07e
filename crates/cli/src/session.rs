//! One viewing session: the store plus the commands that drive it.

use crate::render::{self, OutputFormat};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tabview_core::{FilterUpdate, StoreError, StoreOptions, TabularStore};
use tabview_sheet::{check_size, ExportFormat, Upload};

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Sheets,
    /// 1-based index or sheet name
    Sheet(String),
    Search(String),
    Filter { column: String, value: String },
    Clear,
    Rows,
    /// 1-based page number
    Page(usize),
    Next,
    Prev,
    Size(usize),
    /// 1-based row number in the filtered view
    Select(usize),
    Deselect,
    Show,
    Columns,
    Toggle(String),
    Export {
        path: Option<PathBuf>,
        format: Option<ExportFormat>,
    },
    Reset,
    Help,
    Quit,
}

/// Whether the REPL should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn parse_number(arg: &str, what: &str) -> Result<usize> {
    let n: usize = arg
        .trim()
        .parse()
        .with_context(|| format!("Invalid {what}: '{arg}'"))?;
    if n == 0 {
        bail!("{what} numbers start at 1");
    }
    Ok(n)
}

/// Convert a user-facing 1-based number to an index.
pub fn one_based(n: usize, what: &str) -> Result<usize> {
    match n.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("{what} numbers start at 1"),
    }
}

/// Split `COLUMN=VALUE`; an empty value clears that column's filter.
pub fn parse_filter(arg: &str) -> Result<(String, String)> {
    let (column, value) = arg
        .split_once('=')
        .with_context(|| format!("Invalid filter: '{arg}'. Expected COLUMN=VALUE"))?;
    let column = column.trim();
    if column.is_empty() {
        bail!("Invalid filter: '{arg}'. Column name is empty");
    }
    Ok((column.to_string(), value.trim().to_string()))
}

fn parse_export_format(arg: &str) -> Result<ExportFormat> {
    match arg.to_ascii_lowercase().as_str() {
        "csv" => Ok(ExportFormat::Csv),
        "xlsx" => Ok(ExportFormat::Xlsx),
        other => bail!("Unknown export format: '{other}' (expected csv or xlsx)"),
    }
}

impl Command {
    /// Parse one REPL line. Lines not starting with `:` set the search text.
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Search(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match name {
            "load" | "open" | "o" => {
                if arg.is_empty() {
                    bail!("Usage: :load PATH");
                }
                Command::Load(PathBuf::from(arg))
            }
            "sheets" | "ls" => Command::Sheets,
            "sheet" | "s" => {
                if arg.is_empty() {
                    bail!("Usage: :sheet N|NAME");
                }
                Command::Sheet(arg.to_string())
            }
            "search" | "/" => Command::Search(arg.to_string()),
            "filter" | "f" => {
                let (column, value) = parse_filter(arg)?;
                Command::Filter { column, value }
            }
            "clear" => Command::Clear,
            "rows" | "r" => Command::Rows,
            "page" | "p" => Command::Page(parse_number(arg, "page")?),
            "next" | "n" => Command::Next,
            "prev" => Command::Prev,
            "size" => Command::Size(parse_number(arg, "page size")?),
            "select" | "sel" => Command::Select(parse_number(arg, "row")?),
            "deselect" | "unselect" => Command::Deselect,
            "show" => Command::Show,
            "columns" | "cols" => Command::Columns,
            "toggle" => {
                if arg.is_empty() {
                    bail!("Usage: :toggle COLUMN");
                }
                Command::Toggle(arg.to_string())
            }
            "export" | "x" => {
                let mut parts = arg.split_whitespace();
                let path = parts.next().map(PathBuf::from);
                let format = parts.next().map(parse_export_format).transpose()?;
                Command::Export { path, format }
            }
            "reset" => Command::Reset,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => bail!("Unknown command: :{other}"),
        };
        Ok(command)
    }
}

/// Owns the store for the lifetime of the program.
pub struct Session {
    store: TabularStore,
    format: OutputFormat,
}

impl Session {
    pub fn new(options: StoreOptions, format: OutputFormat) -> Self {
        Self {
            store: TabularStore::new(options),
            format,
        }
    }

    pub fn store(&self) -> &TabularStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TabularStore {
        &mut self.store
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Read a file and load it into the store. The previous workbook stays
    /// in place if reading or parsing fails.
    ///
    /// Files over the upload limit are rejected before they are read.
    pub async fn open(&mut self, path: &Path) -> Result<()> {
        let size = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?
            .len();
        check_size(size, self.store.options().max_upload_bytes).map_err(StoreError::from)?;

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let workbook = self
            .store
            .load_workbook(&Upload::new(name, bytes))
            .with_context(|| format!("Failed to load {}", path.display()))?;
        println!(
            "{} {} ({} sheets)",
            "Loaded".green().bold(),
            workbook.name(),
            workbook.sheet_count()
        );
        Ok(())
    }

    /// Select a sheet by 1-based index or by name.
    pub fn select_sheet(&mut self, target: &str) -> Result<()> {
        let Some(workbook) = self.store.workbook() else {
            bail!("No file loaded");
        };
        let index = match target.parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => workbook
                .sheet_index(target)
                .with_context(|| format!("Sheet not found: {target}"))?,
        };
        if !self.store.select_sheet(index) {
            bail!("Sheet index out of range: {target}");
        }
        Ok(())
    }

    /// Write the filtered rows to `path` (or the suggested file name).
    ///
    /// The format is, in order of preference: explicit, from the path's
    /// extension, matching the loaded file.
    pub async fn export(&self, path: Option<&Path>, format: Option<ExportFormat>) -> Result<PathBuf> {
        let format = format
            .or_else(|| path.and_then(ExportFormat::from_path))
            .unwrap_or_else(|| self.store.default_export_format());
        let export = self.store.export_filtered_rows(format)?;

        let target = match path {
            Some(p) if p.is_dir() => p.join(&export.file_name),
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(&export.file_name),
        };
        tokio::fs::write(&target, &export.bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        println!(
            "{} {} rows to {}",
            "Exported".green().bold(),
            export.row_count,
            target.display()
        );
        Ok(target)
    }

    /// Run one command, printing its result.
    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        tracing::debug!("Running {:?}", command);
        match command {
            Command::Load(path) => {
                self.open(&path).await?;
                render::print_page(&self.store, self.format)?;
            }
            Command::Sheets => render::print_sheets(&self.store),
            Command::Sheet(target) => {
                self.select_sheet(&target)?;
                render::print_page(&self.store, self.format)?;
            }
            Command::Search(text) => {
                self.store.update_filter(FilterUpdate::search(text));
                render::print_page(&self.store, self.format)?;
            }
            Command::Filter { column, value } => {
                self.store.update_filter(FilterUpdate::column(column, value));
                render::print_page(&self.store, self.format)?;
            }
            Command::Clear => {
                self.store.clear_filters();
                render::print_page(&self.store, self.format)?;
            }
            Command::Rows => render::print_page(&self.store, self.format)?,
            Command::Page(n) => {
                self.store.set_page(one_based(n, "page")?);
                render::print_page(&self.store, self.format)?;
            }
            Command::Next => {
                if !self.store.next_page() {
                    println!("{}", "Already on the last page".yellow());
                }
                render::print_page(&self.store, self.format)?;
            }
            Command::Prev => {
                if !self.store.previous_page() {
                    println!("{}", "Already on the first page".yellow());
                }
                render::print_page(&self.store, self.format)?;
            }
            Command::Size(n) => {
                self.store.set_page_size(n)?;
                render::print_page(&self.store, self.format)?;
            }
            Command::Select(n) => {
                if !self.store.select_record(one_based(n, "row")?) {
                    bail!("No row {n} in the current view");
                }
                render::print_record(self.store.selected_record(), self.format)?;
            }
            Command::Deselect => {
                self.store.clear_selection();
                println!("{}", "Selection cleared".yellow());
            }
            Command::Show => render::print_record(self.store.selected_record(), self.format)?,
            Command::Columns => render::print_columns(&self.store),
            Command::Toggle(column) => {
                if !self.store.toggle_column(&column) {
                    bail!("Column not found: {column}");
                }
                render::print_columns(&self.store);
            }
            Command::Export { path, format } => {
                self.export(path.as_deref(), format).await?;
            }
            Command::Reset => {
                self.store.reset();
                println!("{}", "Session cleared".yellow());
            }
            Command::Help => print_help(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

/// Print REPL help.
pub fn print_help() {
    println!("{}", "tabview commands:".cyan().bold());
    println!("  {}   Open a spreadsheet (.xlsx, .xls, .csv)", ":load PATH".yellow());
    println!("  {}        List sheets", ":sheets".yellow());
    println!("  {}   Switch sheet by number or name", ":sheet N|NAME".yellow());
    println!("  {}  Search all columns (or type text without ':')", ":search TEXT".yellow());
    println!("  {}  Filter one column (empty VALUE removes it)", ":filter COL=VALUE".yellow());
    println!("  {}         Remove all filters", ":clear".yellow());
    println!("  {}          Show the current page", ":rows".yellow());
    println!("  {}  Go to page N, next or previous page", ":page N, :next, :prev".yellow());
    println!("  {}        Rows per page", ":size N".yellow());
    println!("  {}      Show row N of the filtered view in detail", ":select N".yellow());
    println!("  {}          Show the selected record again", ":show".yellow());
    println!("  {}      Clear the selected record", ":deselect".yellow());
    println!("  {}  List columns / hide or show one", ":columns, :toggle COL".yellow());
    println!("  {}  Save filtered rows", ":export [PATH] [csv|xlsx]".yellow());
    println!("  {}         Close the file and clear all state", ":reset".yellow());
    println!("  {}  Exit", ":quit, :q, :exit".yellow());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabview_sheet::ParseError;
    use tempfile::tempdir;

    #[test]
    fn test_parse_plain_text_is_search() {
        assert_eq!(
            Command::parse("  calle mayor ").unwrap(),
            Command::Search("calle mayor".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(":q").unwrap(), Command::Quit);
        assert_eq!(Command::parse(":page 3").unwrap(), Command::Page(3));
        assert_eq!(
            Command::parse(":sheet Ventas 2024").unwrap(),
            Command::Sheet("Ventas 2024".to_string())
        );
        assert_eq!(
            Command::parse(":filter City = Madrid").unwrap(),
            Command::Filter {
                column: "City".to_string(),
                value: "Madrid".to_string()
            }
        );
        assert_eq!(
            Command::parse(":export out.csv xlsx").unwrap(),
            Command::Export {
                path: Some(PathBuf::from("out.csv")),
                format: Some(ExportFormat::Xlsx)
            }
        );
        assert_eq!(
            Command::parse(":export").unwrap(),
            Command::Export {
                path: None,
                format: None
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse(":page 0").is_err());
        assert!(Command::parse(":page x").is_err());
        assert!(Command::parse(":filter nocolumn").is_err());
        assert!(Command::parse(":export out.csv pdf").is_err());
        assert!(Command::parse(":bogus").is_err());
    }

    #[tokio::test]
    async fn test_session_flow() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clientes.csv");
        std::fs::write(&input, "ID,Name,City\n1,Ana,Madrid\n2,Luis,Sevilla\n3,Marta,Madrid\n")
            .unwrap();

        let mut session = Session::new(StoreOptions::default(), OutputFormat::Json);
        session.execute(Command::Load(input)).await.unwrap();
        session
            .execute(Command::parse(":filter City=madrid").unwrap())
            .await
            .unwrap();
        assert_eq!(session.store().filtered_count(), 2);

        session.execute(Command::Select(2)).await.unwrap();
        let selected = session.store().selected_record().unwrap();
        assert_eq!(selected.data.get("Name").as_str(), "Marta");

        let out = dir.path().join("madrid.csv");
        let written = session.export(Some(&out), None).await.unwrap();
        assert_eq!(written, out);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "ID,Name,City\n1,Ana,Madrid\n3,Marta,Madrid\n");

        assert!(session.execute(Command::Select(5)).await.is_err());
        assert_eq!(session.execute(Command::Quit).await.unwrap(), Flow::Quit);
    }

    #[tokio::test]
    async fn test_failed_open_keeps_workbook() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "ID\n1\n").unwrap();

        let mut session = Session::new(StoreOptions::default(), OutputFormat::Table);
        session.open(&good).await.unwrap();
        assert!(session.open(&dir.path().join("missing.csv")).await.is_err());
        assert_eq!(session.store().workbook().unwrap().name(), "good.csv");
    }

    #[tokio::test]
    async fn test_open_rejects_oversized_file_before_reading() {
        let dir = tempdir().unwrap();
        let big = dir.path().join("big.csv");
        std::fs::write(&big, "ID,Name\n1,Ana\n2,Luis\n").unwrap();

        let options = StoreOptions::default().with_max_upload_bytes(8);
        let mut session = Session::new(options, OutputFormat::Table);
        let err = session.open(&big).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Parse(ParseError::TooLarge { limit: 8, .. }))
        ));
        assert!(!session.store().has_workbook());
    }

    #[tokio::test]
    async fn test_zero_row_and_page_are_errors() {
        let mut session = Session::new(StoreOptions::default(), OutputFormat::Table);
        let upload = Upload::new("rows.csv", b"ID\n1\n2\n".to_vec());
        session.store_mut().load_workbook(&upload).unwrap();

        assert!(session.execute(Command::Select(0)).await.is_err());
        assert!(session.execute(Command::Page(0)).await.is_err());
        assert!(session.store().selected_record().is_none());
        assert_eq!(session.store().pagination().current_page(), 0);
    }

    #[tokio::test]
    async fn test_deselect() {
        let mut session = Session::new(StoreOptions::default(), OutputFormat::Table);
        let upload = Upload::new("rows.csv", b"ID\n1\n2\n".to_vec());
        session.store_mut().load_workbook(&upload).unwrap();

        session.execute(Command::Select(2)).await.unwrap();
        assert!(session.store().selected_record().is_some());

        assert_eq!(Command::parse(":deselect").unwrap(), Command::Deselect);
        session.execute(Command::Deselect).await.unwrap();
        assert!(session.store().selected_record().is_none());
    }

    #[test]
    fn test_select_sheet_by_name_or_number() {
        let mut session = Session::new(StoreOptions::default(), OutputFormat::Table);
        assert!(session.select_sheet("1").is_err());

        let upload = Upload::new("data.csv", b"A\n1\n".to_vec());
        session.store_mut().load_workbook(&upload).unwrap();
        session.select_sheet("data").unwrap();
        session.select_sheet("1").unwrap();
        assert!(session.select_sheet("2").is_err());
        assert!(session.select_sheet("nope").is_err());
    }
}
