//! Row assembly
//!
//! A worksheet row only lists the cells it populates. Assembly lays those
//! out positionally, filling every gap up to the right-most referenced
//! column with an empty cell. References past the last sheet column are
//! rejected before any gap is filled.

use std::collections::hash_map::Entry;

use ahash::AHashMap;

use crate::cell::{column_index, CellTables, RawCell, RawRow, TypedCell};
use crate::error::{Error, Result};
use crate::resolve::resolve;
use crate::MAX_COLS;

#[cfg(feature = "serde")]
use serde::Serialize;

/// How empty positions are treated when assembling a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowMode {
    /// Keep every position from column 0 to the last referenced column
    #[default]
    Full,
    /// Drop empty cells after assembly
    Compact,
}

/// A typed row
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Row {
    /// Row number (1-based)
    pub index: u32,
    /// Cells in increasing column order
    pub cells: Vec<TypedCell>,
}

impl Row {
    /// Create a row
    pub fn new(index: u32, cells: Vec<TypedCell>) -> Self {
        Self { index, cells }
    }

    /// A row is logically empty when every cell is [`CellValue::Empty`]
    ///
    /// [`CellValue::Empty`]: crate::cell::CellValue::Empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_empty())
    }

    /// Get a cell by column index
    pub fn cell(&self, column: u32) -> Option<&TypedCell> {
        self.cells.iter().find(|c| c.column == column)
    }

    /// Number of cells in row
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Assemble a raw row into typed cells
///
/// Any malformed cell reference fails the whole row. When two cells claim
/// the same column the first one in document order is used.
pub fn assemble_row(row: &RawRow, tables: &CellTables<'_>, mode: RowMode) -> Result<Row> {
    if row.cells.is_empty() {
        return Ok(Row::new(row.index, Vec::new()));
    }

    let mut by_column: AHashMap<u32, &RawCell> = AHashMap::with_capacity(row.cells.len());
    let mut max_column = 0;
    for cell in &row.cells {
        let column = column_index(&cell.reference)?;
        if column >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(column, MAX_COLS - 1));
        }
        max_column = max_column.max(column);
        match by_column.entry(column) {
            Entry::Vacant(slot) => {
                slot.insert(cell);
            }
            Entry::Occupied(_) => log::warn!(
                "row {}: duplicate reference {}, keeping the first cell",
                row.index,
                cell.reference
            ),
        }
    }

    let cells = (0..=max_column)
        .map(|column| resolve(by_column.get(&column).copied(), column, tables))
        .filter(|cell| mode == RowMode::Full || !cell.value.is_empty())
        .collect();

    Ok(Row::new(row.index, cells))
}
