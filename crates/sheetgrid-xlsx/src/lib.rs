//! # sheetgrid-xlsx
//!
//! XLSX (Office Open XML) worksheet source for sheetgrid.
//!
//! Reads the parts of a workbook archive the decoder needs (the sheet list,
//! shared strings, `cellXfs` number formats, the date system and one
//! worksheet's rows) into a [`RawSheet`](sheetgrid_core::RawSheet), then
//! hands it to [`extract_grid`](sheetgrid_core::extract_grid).

pub mod error;
pub mod reader;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxGridReader;
