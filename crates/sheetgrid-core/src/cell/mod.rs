//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellRef`] and the column label codec - a cell's location (e.g., "B7")
//! - [`RawCell`], [`RawRow`], [`RawSheet`] - worksheet input before typing
//! - [`CellValue`], [`TypedCell`] - decoded output

mod address;
mod raw;
mod value;

pub use address::{cell_reference, column_index, column_label, CellRef};
pub(crate) use raw::StyleLookup;
pub use raw::{CellTables, RawCell, RawRow, RawSheet};
pub use value::{CellDebug, CellType, CellValue, ResolveIssue, TypedCell};
