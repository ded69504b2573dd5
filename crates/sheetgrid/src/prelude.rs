//! Prelude module - common imports for sheetgrid users
//!
//! ```rust
//! use sheetgrid::prelude::*;
//! ```

pub use crate::{
    // Entry points
    extract_grid,
    open_grid,
    sheet_names,
    // Cell types
    CellType,
    CellValue,
    // Error types
    Error,
    ExtractOptions,
    Grid,
    RawCell,
    RawRow,
    RawSheet,
    Result,
    Row,
    TypedCell,
};

#[cfg(feature = "xlsx")]
pub use crate::XlsxGridReader;
