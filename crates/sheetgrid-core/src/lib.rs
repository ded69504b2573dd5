//! # sheetgrid-core
//!
//! Typed cell-value decoding for spreadsheet worksheets.
//!
//! A worksheet stores every value as text plus metadata: an optional type
//! tag, a style pointing at a number format, and a shared-string table. This
//! crate recovers what a spreadsheet application would display from that:
//! - [`resolve()`] - one raw cell to a [`CellValue`]
//! - [`assemble_row`] - positional rows with gaps filled
//! - [`extract_grid`] - headers plus typed data rows for a whole sheet
//!
//! ## Example
//!
//! ```rust
//! use sheetgrid_core::{extract_grid, CellType, CellValue, ExtractOptions, RawCell, RawRow, RawSheet};
//!
//! let mut sheet = RawSheet::new("Sheet1");
//! sheet.shared_strings = vec!["Id".into(), "Amount".into()];
//! sheet.style_formats = vec![None, Some(2)];
//! sheet.rows = vec![
//!     RawRow::new(1, vec![
//!         RawCell::new("A1", "0").with_type(CellType::SharedString),
//!         RawCell::new("B1", "1").with_type(CellType::SharedString),
//!     ]),
//!     RawRow::new(2, vec![
//!         RawCell::new("A2", "7"),
//!         RawCell::new("B2", "12.5").with_style(1),
//!     ]),
//! ];
//!
//! let grid = extract_grid(&sheet, &ExtractOptions::default()).unwrap();
//! assert_eq!(grid.headers, vec!["Id", "Amount"]);
//! assert_eq!(grid.rows[0].cells[1].value, CellValue::Double(12.5));
//! ```

pub mod cell;
pub mod date;
pub mod error;
pub mod format;
pub mod grid;
pub mod resolve;
pub mod row;

// Re-exports for convenience
pub use cell::{
    cell_reference, column_index, column_label, CellDebug, CellRef, CellTables, CellType,
    CellValue, RawCell, RawRow, RawSheet, ResolveIssue, TypedCell,
};
pub use date::DateSystem;
pub use error::{Error, Result};
pub use format::FormatCategory;
pub use grid::{extract_grid, ExtractOptions, Grid};
pub use resolve::{resolve, resolve_cell};
pub use row::{assemble_row, Row, RowMode};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
