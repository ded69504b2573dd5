//! sheetgrid CLI - dump typed spreadsheet grids

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetgrid::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetgrid")]
#[command(author, version, about = "Read spreadsheet sheets as typed grids")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a sheet as headers plus typed rows
    Grid {
        /// Input workbook (xlsx, xlsm)
        input: PathBuf,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Keep per-cell reference, raw text, format id and type tag
        #[arg(short, long)]
        debug: bool,

        /// Drop empty cells from data rows
        #[arg(short, long)]
        compact: bool,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,

        /// Print one line per cell instead of JSON
        #[arg(short, long, conflicts_with = "pretty")]
        text: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input workbook
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Grid {
            input,
            sheet,
            debug,
            compact,
            pretty,
            text,
            output,
        } => {
            let options = ExtractOptions {
                debug_info: debug,
                compact,
                sheet_name: sheet,
            };
            dump_grid(&input, &options, pretty, text, output.as_deref())
        }
        Commands::Sheets { input } => list_sheets(&input),
    }
}

fn dump_grid(
    input: &Path,
    options: &ExtractOptions,
    pretty: bool,
    text: bool,
    output: Option<&Path>,
) -> Result<()> {
    let grid = open_grid(input, options)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file '{}'", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if text {
        write_text(&mut out, &grid)?;
    } else if pretty {
        serde_json::to_writer_pretty(&mut out, &grid).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        serde_json::to_writer(&mut out, &grid).context("Failed to write JSON")?;
        writeln!(out)?;
    }

    out.flush()?;

    if let Some(path) = output {
        eprintln!("Wrote {} rows to '{}'", grid.rows.len(), path.display());
    }

    Ok(())
}

fn write_text<W: Write>(out: &mut W, grid: &Grid) -> io::Result<()> {
    writeln!(out, "headers: {}", grid.headers.join(", "))?;
    for row in &grid.rows {
        writeln!(out, "row {}", row.index)?;
        for cell in &row.cells {
            writeln!(out, "  {}", cell)?;
        }
    }
    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let names = sheet_names(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    for (i, name) in names.iter().enumerate() {
        println!("{}: {}", i, name);
    }

    Ok(())
}
