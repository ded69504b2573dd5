//! Raw cell records as handed over by a worksheet source

use super::value::CellType;
use crate::date::DateSystem;

/// One cell exactly as it appears in the worksheet, before typing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCell {
    /// A1-style reference (e.g. "C12")
    pub reference: String,
    /// Explicit data-type tag, if the cell declares one
    pub data_type: Option<CellType>,
    /// Index into the style table
    pub style_index: Option<u32>,
    /// Inner text: inline string content, or the stored value
    pub text: String,
    /// Stored `<v>` payload, when it differs from the inner text
    pub value: Option<String>,
}

impl RawCell {
    /// Create an untyped, unstyled cell
    pub fn new<R: Into<String>, T: Into<String>>(reference: R, text: T) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the explicit data-type tag
    pub fn with_type(mut self, data_type: CellType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Set the style index
    pub fn with_style(mut self, style_index: u32) -> Self {
        self.style_index = Some(style_index);
        self
    }

    /// Set the stored value payload
    pub fn with_value<S: Into<String>>(mut self, value: S) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A worksheet row as a list of raw cells in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    /// Row number (1-based)
    pub index: u32,
    /// Cells present in the row
    pub cells: Vec<RawCell>,
}

impl RawRow {
    /// Create a row
    pub fn new(index: u32, cells: Vec<RawCell>) -> Self {
        Self { index, cells }
    }
}

/// A whole worksheet plus the workbook tables its cells refer to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSheet {
    /// Sheet name
    pub name: String,
    /// Shared-string table
    pub shared_strings: Vec<String>,
    /// Number-format id for each style index (`None` when the style has none)
    pub style_formats: Vec<Option<u32>>,
    /// Epoch for serial dates
    pub date_system: DateSystem,
    /// Rows in document order
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    /// Create an empty sheet with no tables
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Borrow the lookup tables for resolution
    pub fn tables(&self) -> CellTables<'_> {
        CellTables {
            shared_strings: &self.shared_strings,
            style_formats: &self.style_formats,
            date_system: self.date_system,
        }
    }
}

/// Read-only lookup tables shared by every cell of one extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct CellTables<'a> {
    /// Shared-string table
    pub shared_strings: &'a [String],
    /// Number-format id per style index
    pub style_formats: &'a [Option<u32>],
    /// Epoch for serial dates
    pub date_system: DateSystem,
}

/// Outcome of looking a style index up in the style table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StyleLookup {
    /// The style carries this number-format id
    Format(u32),
    /// The style exists but declares no number format
    NoFormat,
    /// The index is past the end of the table
    OutOfRange { len: usize },
}

impl<'a> CellTables<'a> {
    /// Create tables with the default (1900) date system
    pub fn new(shared_strings: &'a [String], style_formats: &'a [Option<u32>]) -> Self {
        Self {
            shared_strings,
            style_formats,
            date_system: DateSystem::default(),
        }
    }

    /// Look up a shared string
    pub fn shared_string(&self, index: usize) -> Option<&'a str> {
        self.shared_strings.get(index).map(String::as_str)
    }

    pub(crate) fn style_format(&self, style_index: u32) -> StyleLookup {
        match self.style_formats.get(style_index as usize) {
            Some(Some(id)) => StyleLookup::Format(*id),
            Some(None) => StyleLookup::NoFormat,
            None => StyleLookup::OutOfRange {
                len: self.style_formats.len(),
            },
        }
    }
}
