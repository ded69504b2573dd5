//! Column labels and A1-style cell references

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Convert column letters to a 0-based index (A = 0, Z = 25, AA = 26, etc.)
///
/// Only the leading alphabetic run is read, so a full reference such as
/// `"AB12"` yields the index of `AB`. Letters are case-insensitive.
///
/// # Examples
/// ```
/// use sheetgrid_core::cell::column_index;
///
/// assert_eq!(column_index("A").unwrap(), 0);
/// assert_eq!(column_index("AA7").unwrap(), 26);
/// assert!(column_index("7").is_err());
/// ```
pub fn column_index(label: &str) -> Result<u32> {
    let letters: &str = {
        let end = label
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(label.len());
        &label[..end]
    };

    if letters.is_empty() {
        return Err(Error::InvalidAddress(format!(
            "no column letters in '{}'",
            label
        )));
    }

    let mut index: u32 = 0;
    for c in letters.bytes() {
        let digit = u32::from(c.to_ascii_uppercase() - b'A') + 1;
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(digit))
            .ok_or_else(|| Error::InvalidAddress(format!("column label too long: '{}'", label)))?;
    }

    Ok(index - 1)
}

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
pub fn column_label(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = i64::from(index);

    while n >= 0 {
        letters.push(b'A' + (n % 26) as u8);
        n = n / 26 - 1;
    }

    letters.iter().rev().map(|&b| b as char).collect()
}

/// Build an A1-style reference from a 1-based row and 0-based column
pub fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_label(col), row)
}

/// A cell location inside a worksheet (e.g., "B7")
///
/// Unlike most of the crate, the row is kept 1-based so it matches the
/// number printed in the reference and the row numbers of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Row number (1-based)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u32,
}

impl CellRef {
    /// Create a new cell reference
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a reference from A1-style notation
    ///
    /// Absolute markers (`$`) are accepted and dropped.
    ///
    /// # Examples
    /// ```
    /// use sheetgrid_core::CellRef;
    ///
    /// let r = CellRef::parse("B7").unwrap();
    /// assert_eq!(r.row, 7);
    /// assert_eq!(r.col, 1);
    /// assert_eq!(r.to_string(), "B7");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let s = s.strip_prefix('$').unwrap_or(s);
        let col = column_index(s)?;

        let rest = &s[s.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(s.len())..];
        let row_str = rest.strip_prefix('$').unwrap_or(rest);
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }

        Ok(Self { row, col })
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        cell_reference(self.row, self.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
