//! Error types for sheetgrid-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a worksheet
///
/// Only structural faults surface here. Cell payloads that fail to parse are
/// never errors: they degrade to text values.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell reference or column label
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row number out of bounds
    #[error("Row number {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u32),

    /// The worksheet has no rows, so there is nothing to take headers from
    #[error("Worksheet '{0}' is empty")]
    EmptySheet(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
