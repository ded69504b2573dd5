//! Grid extraction: headers plus typed data rows for a whole worksheet

use crate::cell::RawSheet;
use crate::error::{Error, Result};
use crate::row::{assemble_row, Row, RowMode};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Options for extracting a grid
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Keep per-cell diagnostics (reference, raw text, format id, type tag)
    pub debug_info: bool,
    /// Drop empty cells from data rows
    pub compact: bool,
    /// Sheet to read; the first sheet when `None`
    pub sheet_name: Option<String>,
}

impl ExtractOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep per-cell diagnostics
    pub fn with_debug_info(mut self, debug_info: bool) -> Self {
        self.debug_info = debug_info;
        self
    }

    /// Drop empty cells from data rows
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Read the named sheet instead of the first one
    pub fn with_sheet_name<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet_name = Some(name.into());
        self
    }
}

/// A worksheet decoded into a header row and typed data rows
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Grid {
    /// Text of each cell in the first row
    pub headers: Vec<String>,
    /// Data rows that hold at least one non-empty cell
    pub rows: Vec<Row>,
}

impl Grid {
    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header, if present
    pub fn column_of(&self, header: &str) -> Option<u32> {
        self.headers
            .iter()
            .position(|h| h == header)
            .map(|i| i as u32)
    }
}

/// Extract the grid of a worksheet
///
/// The first row becomes the headers and is never filtered. Later rows are
/// assembled and dropped when logically empty.
pub fn extract_grid(sheet: &RawSheet, options: &ExtractOptions) -> Result<Grid> {
    let (first, rest) = sheet
        .rows
        .split_first()
        .ok_or_else(|| Error::EmptySheet(sheet.name.clone()))?;

    let tables = sheet.tables();

    let headers: Vec<String> = assemble_row(first, &tables, RowMode::Full)?
        .cells
        .iter()
        .map(|c| c.value.to_string())
        .collect();

    let mode = if options.compact {
        RowMode::Compact
    } else {
        RowMode::Full
    };

    let mut rows = Vec::with_capacity(rest.len());
    for raw in rest {
        let mut row = assemble_row(raw, &tables, mode)?;
        if row.is_empty() {
            log::trace!("'{}': dropping empty row {}", sheet.name, row.index);
            continue;
        }
        if !options.debug_info {
            row.cells = row.cells.into_iter().map(|c| c.into_compact()).collect();
        }
        rows.push(row);
    }

    log::debug!(
        "'{}': {} headers, {} of {} data rows kept",
        sheet.name,
        headers.len(),
        rows.len(),
        rest.len()
    );

    Ok(Grid { headers, rows })
}
