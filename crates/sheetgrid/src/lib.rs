//! # sheetgrid
//!
//! Read spreadsheets into typed grids: a header row plus data rows whose
//! cells carry the value a spreadsheet application would display (integer
//! or decimal, date, duration, boolean, error or text), not the raw stored
//! text.
//!
//! ## Features
//!
//! - `xlsx` (default) - read Office Open XML workbooks (`.xlsx`, `.xlsm`)
//! - `serde` - `Serialize` for grids, rows and cell values
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetgrid::prelude::*;
//!
//! let options = ExtractOptions::new().with_sheet_name("Ledger");
//! let grid = open_grid("book.xlsx", &options).unwrap();
//!
//! println!("{}", grid.headers.join(" | "));
//! for row in &grid.rows {
//!     for cell in &row.cells {
//!         println!("{}", cell);
//!     }
//! }
//! ```

pub mod prelude;

// Re-export core types
pub use sheetgrid_core::{
    // Cell types
    CellDebug,
    CellRef,
    CellTables,
    CellType,
    CellValue,
    DateSystem,
    // Error types
    Error,
    // Extraction
    ExtractOptions,
    FormatCategory,
    Grid,
    RawCell,
    RawRow,
    RawSheet,
    ResolveIssue,
    Result,
    Row,
    RowMode,
    TypedCell,
    // Constants
    MAX_COLS,
    MAX_ROWS,
};

pub use sheetgrid_core::{
    assemble_row, cell_reference, column_index, column_label, extract_grid, resolve, resolve_cell,
};

// Re-export I/O types
#[cfg(feature = "xlsx")]
pub use sheetgrid_xlsx::{XlsxError, XlsxGridReader};

use std::path::Path;

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn unsupported(path: &Path) -> Error {
    Error::other(format!("Unsupported file format: {}", path.display()))
}

/// Open a spreadsheet file and extract the grid of one sheet
///
/// The reader is chosen from the file extension.
pub fn open_grid<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Grid> {
    let path = path.as_ref();

    match extension(path).as_deref() {
        #[cfg(feature = "xlsx")]
        Some("xlsx") | Some("xlsm") => {
            XlsxGridReader::read_file(path, options).map_err(into_core_error)
        }
        _ => Err(unsupported(path)),
    }
}

/// List the sheet names of a spreadsheet file, in workbook order
pub fn sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();

    match extension(path).as_deref() {
        #[cfg(feature = "xlsx")]
        Some("xlsx") | Some("xlsm") => {
            let file = std::fs::File::open(path)
                .map_err(|e| Error::other(format!("{}: {}", path.display(), e)))?;
            XlsxGridReader::sheet_names(file).map_err(into_core_error)
        }
        _ => Err(unsupported(path)),
    }
}

/// Keep core errors as they are; flatten container errors to text
#[cfg(feature = "xlsx")]
fn into_core_error(e: XlsxError) -> Error {
    match e {
        XlsxError::Core(core) => core,
        other => Error::other(other.to_string()),
    }
}
