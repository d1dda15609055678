//! sheet-seek CLI - search spreadsheets from the command line

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use sheet_seek::prelude::*;

#[derive(Parser)]
#[command(name = "seek")]
#[command(author, version, about = "Find sheets, cells and rows in spreadsheets")]
struct Cli {
    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all sheets in a workbook
    Sheets {
        /// Input spreadsheet file (xlsx, xlsm, csv)
        input: PathBuf,
    },

    /// Show the used range of every sheet
    Info {
        /// Input spreadsheet file
        input: PathBuf,
    },

    /// List the sheets with a matching cell in ROWS x COLS
    FindSheets {
        /// Input spreadsheet file
        input: PathBuf,

        /// Rows to scan, e.g. 2..10, rev:2..10, 1,5,6
        #[arg(short, long)]
        rows: RangeSpec,

        /// Columns to scan, same syntax as --rows
        #[arg(short, long)]
        cols: RangeSpec,

        /// Criteria, e.g. Hoge, "Ho*", ">5", "=" for empty
        #[arg(short = 'm', long = "match")]
        criteria: Criteria,
    },

    /// Print the first matching cell of a sheet, scanning rows then columns
    FindCell {
        /// Input spreadsheet file
        input: PathBuf,

        /// Sheet name
        #[arg(short, long)]
        sheet: String,

        /// Rows to scan, in scan order
        #[arg(short, long)]
        rows: RangeSpec,

        /// Columns to scan, in scan order
        #[arg(short, long)]
        cols: RangeSpec,

        /// Criteria the cell must meet
        #[arg(short = 'm', long = "match")]
        criteria: Criteria,
    },

    /// Print the values of each row over the given columns
    Rows {
        /// Input spreadsheet file
        input: PathBuf,

        /// Sheet name
        #[arg(short, long)]
        sheet: String,

        /// Rows to print (must end)
        #[arg(short, long)]
        rows: RangeSpec,

        /// Columns to read; an unbounded range needs --stop-at-empty or --max
        #[arg(short, long)]
        cols: RangeSpec,

        /// End each row before its first empty cell
        #[arg(long)]
        stop_at_empty: bool,

        /// Read at most this many values per row
        #[arg(long)]
        max: Option<usize>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let out = Output { json: cli.json };

    match cli.command {
        Commands::Sheets { input } => list_sheets(&input, out),
        Commands::Info { input } => show_info(&input, out),
        Commands::FindSheets {
            input,
            rows,
            cols,
            criteria,
        } => find_sheets(&input, rows, cols, criteria, out),
        Commands::FindCell {
            input,
            sheet,
            rows,
            cols,
            criteria,
        } => find_cell(&input, &sheet, rows, cols, criteria, out),
        Commands::Rows {
            input,
            sheet,
            rows,
            cols,
            stop_at_empty,
            max,
        } => {
            let stop = RowStop { stop_at_empty, max };
            print_rows(&input, &sheet, rows, cols, stop, out)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

/// Output mode shared by all subcommands
#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

fn open(input: &Path) -> Result<ExcelHandle> {
    ExcelHandle::open(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn warn_if_unbounded(rows: &RangeSpec, cols: &RangeSpec) {
    if !rows.is_finite() || !cols.is_finite() {
        tracing::warn!("unbounded range: the scan only ends when a cell matches");
    }
}

fn list_sheets(input: &Path, out: Output) -> Result<ExitCode> {
    let book = open(input)?;
    let names = book.sheet_names();

    if out.json {
        println!("{}", json!(names));
    } else {
        for (i, name) in names.iter().enumerate() {
            println!("{}\t{}", i, name);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn show_info(input: &Path, out: Output) -> Result<ExitCode> {
    let book = open(input)?;
    let workbook = book.workbook();

    if out.json {
        let sheets: Vec<_> = workbook
            .worksheets()
            .map(|sheet| {
                json!({
                    "name": sheet.name(),
                    "visible": sheet.is_visible(),
                    "cells": sheet.cell_count(),
                    "used_range": sheet
                        .used_range()
                        .map(|(first, last)| format!("{}:{}", first, last)),
                })
            })
            .collect();
        println!("{}", json!({ "file": input.display().to_string(), "sheets": sheets }));
        return Ok(ExitCode::SUCCESS);
    }

    println!("File: {}", input.display());
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());
        if !sheet.is_visible() {
            println!("    Hidden");
        }
        match sheet.used_range() {
            Some((first, last)) => println!("    Used range: {}:{}", first, last),
            None => println!("    Used range: empty"),
        }
        println!("    Cells: {}", sheet.cell_count());
    }

    Ok(ExitCode::SUCCESS)
}

fn find_sheets(
    input: &Path,
    rows: RangeSpec,
    cols: RangeSpec,
    criteria: Criteria,
    out: Output,
) -> Result<ExitCode> {
    let book = open(input)?;
    warn_if_unbounded(&rows, &cols);

    let names = book.find_sheets(&rows, &cols, criteria);

    if out.json {
        println!("{}", json!(names));
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    Ok(if names.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn find_cell(
    input: &Path,
    sheet: &str,
    rows: RangeSpec,
    cols: RangeSpec,
    criteria: Criteria,
    out: Output,
) -> Result<ExitCode> {
    let book = open(input)?;
    warn_if_unbounded(&rows, &cols);

    let found = book
        .find_cell_address(sheet, &rows, &cols, criteria)
        .with_context(|| format!("Failed to search sheet '{}'", sheet))?;

    match (found, out.json) {
        (Some(addr), true) => println!(
            "{}",
            json!({ "row": addr.row, "col": addr.col, "address": addr.to_string() })
        ),
        (Some(addr), false) => println!("{}\t{}\t{}", addr.row, addr.col, addr),
        (None, true) => println!("null"),
        (None, false) => println!("not found"),
    }

    Ok(if found.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Row stop condition built from `--stop-at-empty` and `--max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowStop {
    stop_at_empty: bool,
    max: Option<usize>,
}

impl RowStop {
    fn is_set(&self) -> bool {
        self.stop_at_empty || self.max.is_some()
    }
}

impl RowMatcher for RowStop {
    fn matches(&mut self, row: &[CellValue]) -> bool {
        let over_max = self.max.map_or(false, |max| row.len() > max);
        let hit_empty = self.stop_at_empty && row.last().map_or(false, CellValue::is_empty);
        over_max || hit_empty
    }
}

fn check_row_ranges(rows: &RangeSpec, cols: &RangeSpec, stop: RowStop) -> Result<()> {
    if !rows.is_finite() {
        bail!("--rows must be finite for the rows command (got '{}')", rows);
    }
    if !cols.is_finite() && !stop.is_set() {
        bail!(
            "--cols '{}' has no end; add --stop-at-empty or --max so rows finish",
            cols
        );
    }
    Ok(())
}

fn print_rows(
    input: &Path,
    sheet: &str,
    rows: RangeSpec,
    cols: RangeSpec,
    stop: RowStop,
    out: Output,
) -> Result<ExitCode> {
    check_row_ranges(&rows, &cols, stop)?;
    let book = open(input)?;

    let values = book
        .iterate_row_values(sheet, &rows, &cols, stop)
        .with_context(|| format!("Failed to read sheet '{}'", sheet))?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    for (row, values) in rows.cursor().zip(values) {
        if out.json {
            writeln!(stdout, "{}", json!({ "row": row, "values": values }))?;
        } else {
            let fields: Vec<String> = values.iter().map(cell_text).collect();
            writeln!(stdout, "{}", fields.join("\t"))?;
        }
    }

    stdout.flush().context("Failed to write to stdout")?;
    Ok(ExitCode::SUCCESS)
}

/// Render a cell for tab-separated output
fn cell_text(value: &CellValue) -> String {
    let text = match value {
        CellValue::Empty => String::new(),
        CellValue::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        CellValue::String(s) => s.to_string(),
        CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::Error(e) => e.to_string(),
    };

    // Keep one row per line and one value per field
    text.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
