//! # tabview-cli
//!
//! Command-line viewer for spreadsheet files.

mod render;
mod session;

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use render::OutputFormat;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use session::{one_based, parse_filter, Command, Flow, Session};
use std::path::PathBuf;
use tabview_core::{FilterUpdate, StoreOptions};
use tabview_sheet::ExportFormat;
use tracing_subscriber::EnvFilter;

/// tabview - Browse, filter and export spreadsheet data
#[derive(Parser, Debug)]
#[command(name = "tabview")]
#[command(author, version, about = "Browse, filter and export spreadsheet data", long_about = None)]
struct Cli {
    /// Spreadsheet to open (.xlsx, .xls, .csv)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Sheet to show, by 1-based number or name
    #[arg(short = 's', long = "sheet")]
    sheet: Option<String>,

    /// Case-insensitive search across all columns
    #[arg(short = 'q', long = "search")]
    search: Option<String>,

    /// Column filter (repeatable)
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    filters: Vec<String>,

    /// Page to show (1-based)
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    page: usize,

    /// Rows per page
    #[arg(long = "page-size")]
    page_size: Option<usize>,

    /// Show row N of the filtered view in detail (1-based)
    #[arg(long = "select", value_name = "N")]
    select: Option<usize>,

    /// Write the filtered rows to this file
    #[arg(short = 'o', long = "export", value_name = "PATH")]
    export: Option<PathBuf>,

    /// Export format (defaults to the extension of --export, then the input format)
    #[arg(long = "export-format")]
    export_format: Option<ExportKind>,

    /// Output format (json, csv, table)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Maximum accepted file size in MiB
    #[arg(long = "max-upload-mb", default_value_t = 10)]
    max_upload_mb: usize,

    /// Start REPL mode
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum ExportKind {
    Xlsx,
    Csv,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Xlsx => ExportFormat::Xlsx,
            ExportKind::Csv => ExportFormat::Csv,
        }
    }
}

impl Cli {
    fn store_options(&self) -> StoreOptions {
        let options =
            StoreOptions::default().with_max_upload_bytes(self.max_upload_mb.saturating_mul(1024 * 1024));
        match self.page_size {
            Some(size) => options.with_page_size(size),
            None => options,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    if cli.page_size == Some(0) {
        bail!("--page-size must be at least 1");
    }

    let mut session = Session::new(cli.store_options(), cli.format);

    if let Some(file) = &cli.file {
        session.open(file).await?;
    }

    if cli.interactive {
        run_repl(&mut session).await
    } else if cli.file.is_some() {
        run_once(&mut session, &cli).await
    } else {
        // No arguments - show help
        Cli::parse_from(["tabview", "--help"]);
        Ok(())
    }
}

/// Apply the command-line view settings to an opened file and print the result.
async fn run_once(session: &mut Session, cli: &Cli) -> Result<()> {
    if cli.select == Some(0) {
        bail!("--select row numbers start at 1");
    }
    apply_view(session, cli)?;

    if let Some(n) = cli.select {
        session.execute(Command::Select(n)).await?;
    } else {
        render::print_page(session.store(), session.format())?;
    }

    if let Some(path) = &cli.export {
        session
            .export(Some(path), cli.export_format.map(ExportFormat::from))
            .await?;
    }
    Ok(())
}

fn apply_view(session: &mut Session, cli: &Cli) -> Result<()> {
    if let Some(sheet) = &cli.sheet {
        session.select_sheet(sheet)?;
    }

    let mut update = FilterUpdate::new();
    if let Some(search) = &cli.search {
        update = update.with_search(search.clone());
    }
    for filter in &cli.filters {
        let (column, value) = parse_filter(filter)?;
        update = update.with_column(column, value);
    }
    session.store_mut().update_filter(update);

    let page = one_based(cli.page, "--page")?;
    session.store_mut().set_page(page);
    Ok(())
}

/// Run the REPL.
async fn run_repl(session: &mut Session) -> Result<()> {
    println!(
        "{} {} - Interactive Mode",
        "tabview".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Type {} for help, {} to exit\n",
        ":help".yellow(),
        ":quit".yellow()
    );

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    // Load history if available
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = "tabview> ".green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let command = match Command::parse(line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{} {e}", "Error:".red().bold());
                        continue;
                    }
                };

                match session.execute(command).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("{} {e:#}", "Error:".red().bold()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("tabview");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}
