//! Typed cell values produced by the resolver

use chrono::{Duration, NaiveDateTime};
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A decoded cell value
///
/// `Empty` and `Error` are explicit so that an absent cell, an empty string
/// and a zero never collapse into the same representation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
pub enum CellValue {
    /// No value
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Bool(bool),

    /// Whole number
    Int(i64),

    /// Number with a fractional part
    Double(f64),

    /// Calendar date, with or without a time-of-day component
    DateTime(NaiveDateTime),

    /// Elapsed time or time of day
    Duration(
        #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_duration"))] Duration,
    ),

    /// Text, kept exactly as found
    Text(String),

    /// Error sentinel stored in the cell (e.g. `#DIV/0!`)
    Error(String),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains an error sentinel
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Try to get the value as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the tag name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::Bool(_) => "Bool",
            CellValue::Int(_) => "Int",
            CellValue::Double(_) => "Double",
            CellValue::DateTime(_) => "DateTime",
            CellValue::Duration(_) => "Duration",
            CellValue::Text(_) => "Text",
            CellValue::Error(_) => "Error",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Double(n) => write!(f, "{}", n),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Duration(d) => write!(f, "{}", format_duration(d)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(code) => write!(f, "ERROR: {}", code),
        }
    }
}

/// Render a duration as `[-]h:mm:ss[.fff]` with unbounded hours
fn format_duration(d: &Duration) -> String {
    let millis = d.num_milliseconds();
    let sign = if millis < 0 { "-" } else { "" };
    let millis = millis.unsigned_abs();

    let secs = millis / 1000;
    let frac = millis % 1000;
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);

    if frac == 0 {
        format!("{}{}:{:02}:{:02}", sign, h, m, s)
    } else {
        format!("{}{}:{:02}:{:02}.{:03}", sign, h, m, s, frac)
    }
}

#[cfg(feature = "serde")]
fn serialize_duration<S: serde::Serializer>(
    d: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.num_milliseconds() as f64 / 1000.0)
}

/// Explicit data-type tag carried by a raw cell (the `t` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CellType {
    /// `s` - index into the shared-string table
    SharedString,
    /// `b` - boolean flag
    Boolean,
    /// `d` - ISO 8601 date text
    Date,
    /// `n` - number
    Number,
    /// `e` - error sentinel
    Error,
    /// `inlineStr` - text stored in the cell itself
    InlineString,
    /// `str` - text result of a formula
    String,
}

impl CellType {
    /// Parse the SpreadsheetML type attribute
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "s" => Some(CellType::SharedString),
            "b" => Some(CellType::Boolean),
            "d" => Some(CellType::Date),
            "n" => Some(CellType::Number),
            "e" => Some(CellType::Error),
            "inlineStr" => Some(CellType::InlineString),
            "str" => Some(CellType::String),
            _ => None,
        }
    }

    /// Get the SpreadsheetML type attribute
    pub fn as_tag(&self) -> &'static str {
        match self {
            CellType::SharedString => "s",
            CellType::Boolean => "b",
            CellType::Date => "d",
            CellType::Number => "n",
            CellType::Error => "e",
            CellType::InlineString => "inlineStr",
            CellType::String => "str",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// A data fault the resolver recovered from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ResolveIssue {
    /// Shared-string cell whose payload is not an index
    InvalidSharedStringIndex,
    /// Shared-string index past the end of the table
    SharedStringOutOfRange { index: usize, len: usize },
    /// Style index past the end of the style table
    StyleOutOfRange { style: u32, len: usize },
}

/// Diagnostic fields kept alongside a resolved value in debug mode
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CellDebug {
    /// Source cell reference (e.g. "C12")
    pub reference: String,
    /// Raw inner text
    pub raw_text: String,
    /// Number-format id the style resolved to; `None` for explicitly typed cells
    pub format_id: Option<u32>,
    /// Explicit type tag of the source cell
    pub data_type: Option<CellType>,
    /// Recovered fault, if any
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub issue: Option<ResolveIssue>,
}

/// A resolved cell at a column position
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TypedCell {
    /// Column index (0-based)
    pub column: u32,
    /// Decoded value
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub value: CellValue,
    /// Diagnostics; `None` for empty cells and outside debug mode
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub debug: Option<CellDebug>,
}

impl TypedCell {
    /// Create a cell with no diagnostics
    pub fn new(column: u32, value: CellValue) -> Self {
        Self {
            column,
            value,
            debug: None,
        }
    }

    /// Create an empty cell
    pub fn empty(column: u32) -> Self {
        Self::new(column, CellValue::Empty)
    }

    /// Drop the diagnostic fields
    pub fn into_compact(self) -> Self {
        Self {
            debug: None,
            ..self
        }
    }
}

impl fmt::Display for TypedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.debug {
            Some(d) => write!(
                f,
                "{} ({}): {} ({}), raw: '{}', format: {:?}, type: {:?}",
                d.reference,
                self.column,
                self.value,
                self.value.type_name(),
                d.raw_text,
                d.format_id,
                d.data_type.map(|t| t.as_tag()),
            ),
            None => write!(
                f,
                "{}: {} ({})",
                self.column,
                self.value,
                self.value.type_name()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
        assert_eq!(CellValue::Int(100).to_string(), "100");
        assert_eq!(CellValue::Double(1.5).to_string(), "1.5");
        assert_eq!(CellValue::text("Id").to_string(), "Id");
        assert_eq!(CellValue::Error("#N/A".into()).to_string(), "ERROR: #N/A");

        let dt = NaiveDate::from_ymd_opt(1900, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).to_string(), "1900-01-01 12:00:00");
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(CellValue::Duration(Duration::hours(12)).to_string(), "12:00:00");
        assert_eq!(CellValue::Duration(Duration::hours(36)).to_string(), "36:00:00");
        assert_eq!(
            CellValue::Duration(Duration::milliseconds(-90_500)).to_string(),
            "-0:01:30.500"
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::default().is_empty());
        assert!(!CellValue::text("  ").is_empty());
        assert!(!CellValue::text("").is_empty());
        assert!(!CellValue::Int(0).is_empty());
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(CellValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Double(0.5).as_f64(), Some(0.5));
        assert_eq!(CellValue::text("3").as_f64(), None);
    }

    #[test]
    fn test_cell_type_tags() {
        for tag in ["s", "b", "d", "n", "e", "inlineStr", "str"] {
            assert_eq!(CellType::from_tag(tag).unwrap().as_tag(), tag);
        }
        assert_eq!(CellType::from_tag("x"), None);
    }

    #[test]
    fn test_into_compact_drops_debug() {
        let cell = TypedCell {
            column: 2,
            value: CellValue::Int(7),
            debug: Some(CellDebug {
                reference: "C4".into(),
                raw_text: "7".into(),
                format_id: Some(1),
                data_type: None,
                issue: None,
            }),
        };
        assert_eq!(cell.to_string(), "C4 (2): 7 (Int), raw: '7', format: Some(1), type: None");
        assert_eq!(cell.into_compact(), TypedCell::new(2, CellValue::Int(7)));
    }
}
