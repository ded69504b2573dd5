//! Cell value resolution
//!
//! Turns a [`RawCell`] into a [`TypedCell`]. A cell that declares its own type
//! is decoded from that tag alone; otherwise the number format behind its
//! style decides, with payload-shape inference when the format is custom or
//! missing. Resolution never fails: anything that does not parse the way the
//! tag or format promises comes back as text.

use std::borrow::Cow;

use crate::cell::{
    column_index, CellDebug, CellTables, CellType, CellValue, RawCell, ResolveIssue, StyleLookup,
    TypedCell,
};
use crate::date::{
    duration_from_days, from_oa_date, parse_date_text, parse_duration_text, truncate_to_date,
};
use crate::error::Result;
use crate::format::FormatCategory;

/// Maximum distance to the nearest integer for a float to count as whole
///
/// Absolute rather than relative: values large enough for this to matter
/// (beyond 2^53) have no fractional bits left and are whole anyway.
pub const WHOLE_NUMBER_EPSILON: f64 = 1e-9;

/// Resolve a cell at a known column position
///
/// `None` stands for a position the row does not populate and resolves to
/// [`CellValue::Empty`]. Debug fields are always filled for non-empty cells;
/// dropping them is the caller's projection.
pub fn resolve(cell: Option<&RawCell>, column: u32, tables: &CellTables<'_>) -> TypedCell {
    let cell = match cell {
        Some(c) => c,
        None => return TypedCell::empty(column),
    };

    let decoded = match cell.data_type {
        Some(data_type) => decode_by_type(cell, data_type, tables),
        None => decode_by_format(cell, tables),
    };

    if decoded.value.is_empty() {
        return TypedCell::empty(column);
    }

    TypedCell {
        column,
        value: decoded.value,
        debug: Some(CellDebug {
            reference: cell.reference.clone(),
            raw_text: cell.text.clone(),
            format_id: decoded.format_id,
            data_type: cell.data_type,
            issue: decoded.issue,
        }),
    }
}

/// Resolve a cell, taking its column from its own reference
pub fn resolve_cell(cell: &RawCell, tables: &CellTables<'_>) -> Result<TypedCell> {
    let column = column_index(&cell.reference)?;
    Ok(resolve(Some(cell), column, tables))
}

struct Decoded {
    value: CellValue,
    format_id: Option<u32>,
    issue: Option<ResolveIssue>,
}

impl Decoded {
    fn value(value: CellValue) -> Self {
        Self {
            value,
            format_id: None,
            issue: None,
        }
    }
}

fn decode_by_type(cell: &RawCell, data_type: CellType, tables: &CellTables<'_>) -> Decoded {
    let text = cell.text.as_str();

    match data_type {
        CellType::SharedString => shared_string(cell, tables),
        CellType::Boolean => Decoded::value(CellValue::Bool(text.trim() == "1")),
        CellType::Date => Decoded::value(
            parse_date_text(text)
                .map(|dt| CellValue::DateTime(truncate_to_date(dt)))
                .unwrap_or_else(|| text_fallback(cell, "date")),
        ),
        CellType::Number => Decoded::value(
            parse_number(text)
                .map(number_value)
                .unwrap_or_else(|| text_fallback(cell, "number")),
        ),
        CellType::Error => Decoded::value(CellValue::Error(text.to_string())),
        CellType::InlineString | CellType::String => {
            Decoded::value(CellValue::Text(text.to_string()))
        }
    }
}

fn shared_string(cell: &RawCell, tables: &CellTables<'_>) -> Decoded {
    let text = cell.text.trim();

    let issue = match text.parse::<usize>() {
        Ok(index) => match tables.shared_string(index) {
            Some(s) => return Decoded::value(CellValue::text(s)),
            None => ResolveIssue::SharedStringOutOfRange {
                index,
                len: tables.shared_strings.len(),
            },
        },
        Err(_) => ResolveIssue::InvalidSharedStringIndex,
    };

    log::warn!(
        "{}: unusable shared-string index '{}' ({:?})",
        cell.reference,
        cell.text,
        issue
    );

    Decoded {
        value: CellValue::Text(cell.text.clone()),
        format_id: None,
        issue: Some(issue),
    }
}

fn decode_by_format(cell: &RawCell, tables: &CellTables<'_>) -> Decoded {
    let text = cell.text.as_str();
    let has_value = cell.value.as_deref().map_or(false, |v| !v.is_empty());
    if text.is_empty() && !has_value {
        return Decoded::value(CellValue::Empty);
    }

    let mut issue = None;
    if let Some(style) = cell.style_index {
        match tables.style_format(style) {
            StyleLookup::Format(id) => {
                return Decoded {
                    value: decode_formatted(cell, FormatCategory::classify(id), tables),
                    format_id: Some(id),
                    issue: None,
                };
            }
            StyleLookup::NoFormat => {}
            StyleLookup::OutOfRange { len } => {
                log::warn!(
                    "{}: style index {} out of bounds ({} styles)",
                    cell.reference,
                    style,
                    len
                );
                issue = Some(ResolveIssue::StyleOutOfRange { style, len });
            }
        }
    }

    let value = if let Some(n) = parse_number(text) {
        number_value(n)
    } else if let Some(s) = cell
        .value
        .as_deref()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .and_then(|i| tables.shared_string(i))
    {
        log::trace!(
            "{}: untyped cell resolved through the shared-string table",
            cell.reference
        );
        CellValue::text(s)
    } else {
        CellValue::Text(text.to_string())
    };

    Decoded {
        value,
        format_id: None,
        issue,
    }
}

fn decode_formatted(cell: &RawCell, category: FormatCategory, tables: &CellTables<'_>) -> CellValue {
    let text = cell.text.as_str();

    let value = match category {
        FormatCategory::General | FormatCategory::Text => {
            return CellValue::Text(text.to_string());
        }
        FormatCategory::Decimal
        | FormatCategory::Thousands
        | FormatCategory::Percentage
        | FormatCategory::Scientific
        | FormatCategory::Accounting
        | FormatCategory::Custom => parse_number(text).map(number_value),
        FormatCategory::Fraction => parse_number(text).map(CellValue::Double),
        FormatCategory::DateOnly => parse_number(text)
            .and_then(|serial| from_oa_date(serial, tables.date_system))
            .map(|dt| CellValue::DateTime(truncate_to_date(dt))),
        FormatCategory::DateTime => parse_number(text)
            .and_then(|serial| from_oa_date(serial, tables.date_system))
            .map(CellValue::DateTime),
        FormatCategory::TimeOfDay | FormatCategory::Duration => match parse_number(text) {
            Some(days) => duration_from_days(days),
            None => parse_duration_text(text),
        }
        .map(CellValue::Duration),
    };

    value.unwrap_or_else(|| text_fallback(cell, "formatted"))
}

fn text_fallback(cell: &RawCell, expected: &str) -> CellValue {
    log::trace!(
        "{}: '{}' is not a valid {} payload, keeping text",
        cell.reference,
        cell.text,
        expected
    );
    CellValue::Text(cell.text.clone())
}

/// Parse a number with the invariant (culture-free) convention
///
/// Accepts surrounding whitespace, a leading sign, `,` group separators in
/// the integer part, a `.` decimal point, an exponent, and accounting-style
/// parentheses for negatives. Non-finite results are rejected.
///
/// # Examples
/// ```
/// use sheetgrid_core::resolve::parse_number;
///
/// assert_eq!(parse_number(" 1,234.5 "), Some(1234.5));
/// assert_eq!(parse_number("(42)"), Some(-42.0));
/// assert_eq!(parse_number("1e3"), Some(1000.0));
/// assert_eq!(parse_number("NaN"), None);
/// assert_eq!(parse_number("12 kg"), None);
/// ```
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim();

    let (negated, s) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };
    if s.is_empty() || (negated && s.starts_with(['-', '+'])) {
        return None;
    }

    let s: Cow<'_, str> = if s.contains(',') {
        let int_end = s.find(['.', 'e', 'E']).unwrap_or(s.len());
        if s[int_end..].contains(',') {
            return None;
        }
        Cow::Owned(s.replace(',', ""))
    } else {
        Cow::Borrowed(s)
    };

    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
    {
        return None;
    }

    let n: f64 = s.parse().ok()?;
    if !n.is_finite() {
        return None;
    }

    Some(if negated { -n } else { n })
}

/// Type a parsed number as [`CellValue::Int`] or [`CellValue::Double`]
pub fn number_value(n: f64) -> CellValue {
    match whole_number(n) {
        Some(i) => CellValue::Int(i),
        None => CellValue::Double(n),
    }
}

/// The integer `n` rounds to, if it is whole within [`WHOLE_NUMBER_EPSILON`]
pub fn whole_number(n: f64) -> Option<i64> {
    // 2^63; i64::MAX itself is not representable as f64
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

    let rounded = n.round();
    if (n - rounded).abs() >= WHOLE_NUMBER_EPSILON || rounded < -I64_BOUND || rounded >= I64_BOUND
    {
        return None;
    }
    Some(rounded as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateSystem;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn strings() -> Vec<String> {
        vec!["Id".to_string(), "Amount".to_string(), "A1".to_string()]
    }

    /// style 0: no format, 1: decimal, 2: short date, 3: datetime, 4: time,
    /// 5: elapsed, 6: fraction, 7: text, 8: custom, 9: general, 10: percent
    fn formats() -> Vec<Option<u32>> {
        vec![
            None,
            Some(1),
            Some(14),
            Some(22),
            Some(20),
            Some(46),
            Some(12),
            Some(49),
            Some(200),
            Some(0),
            Some(10),
        ]
    }

    fn value_of(cell: RawCell) -> CellValue {
        let (s, f) = (strings(), formats());
        resolve(Some(&cell), 0, &CellTables::new(&s, &f)).value
    }

    fn styled(text: &str, style: u32) -> CellValue {
        value_of(RawCell::new("A1", text).with_style(style))
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_missing_cell_is_empty() {
        let (s, f) = (strings(), formats());
        let cell = resolve(None, 4, &CellTables::new(&s, &f));
        assert_eq!(cell, TypedCell::empty(4));
    }

    #[test]
    fn test_valueless_styled_cell_is_empty() {
        assert_eq!(styled("", 1), CellValue::Empty);
        let (s, f) = (strings(), formats());
        let cell = resolve(Some(&RawCell::new("B2", "").with_style(1)), 1, &CellTables::new(&s, &f));
        assert_eq!(cell.debug, None);
    }

    #[test]
    fn test_decimal_whole_vs_fractional() {
        assert_eq!(styled("1", 1), CellValue::Int(1));
        assert_eq!(styled("1.5", 1), CellValue::Double(1.5));
        assert_eq!(
            styled("123456789.123456", 1),
            CellValue::Double(123456789.123456)
        );
        assert_eq!(styled("0.5", 10), CellValue::Double(0.5));
        assert_eq!(styled("abc", 1), CellValue::text("abc"));
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(styled("1", 2), CellValue::DateTime(datetime(1899, 12, 31, 0)));
        // Date-only formats truncate the time of day
        assert_eq!(styled("2.5", 2), CellValue::DateTime(datetime(1900, 1, 1, 0)));
        assert_eq!(styled("2.5", 3), CellValue::DateTime(datetime(1900, 1, 1, 12)));
        assert_eq!(styled("soon", 3), CellValue::text("soon"));
        assert_eq!(styled("9999999", 3), CellValue::text("9999999"));
    }

    #[test]
    fn test_date_1904_system() {
        let (s, f) = (strings(), formats());
        let tables = CellTables {
            date_system: DateSystem::Mac1904,
            ..CellTables::new(&s, &f)
        };
        let cell = RawCell::new("A1", "1").with_style(2);
        assert_eq!(
            resolve(Some(&cell), 0, &tables).value,
            CellValue::DateTime(datetime(1904, 1, 2, 0))
        );
    }

    #[test]
    fn test_time_and_duration_formats() {
        assert_eq!(styled("0.5", 4), CellValue::Duration(Duration::hours(12)));
        assert_eq!(styled("1.5", 5), CellValue::Duration(Duration::hours(36)));
        assert_eq!(styled("12:30", 4), CellValue::Duration(Duration::minutes(750)));
        assert_eq!(styled("noon", 4), CellValue::text("noon"));
    }

    #[test]
    fn test_oversized_duration_text_degrades_to_text() {
        assert_eq!(
            styled("99999999999999999:00", 4),
            CellValue::text("99999999999999999:00")
        );
        assert_eq!(
            styled("9999999.0:00:00", 5),
            CellValue::text("9999999.0:00:00")
        );
    }

    #[test]
    fn test_fraction_is_always_double() {
        assert_eq!(styled("0.5", 6), CellValue::Double(0.5));
        assert_eq!(styled("2", 6), CellValue::Double(2.0));
    }

    #[test]
    fn test_text_and_general_keep_raw_text() {
        assert_eq!(styled("00123", 7), CellValue::text("00123"));
        assert_eq!(styled("42", 9), CellValue::text("42"));
    }

    #[test]
    fn test_custom_format_falls_back_to_payload_shape() {
        assert_eq!(styled("42", 8), CellValue::Int(42));
        assert_eq!(styled("4.2", 8), CellValue::Double(4.2));
        assert_eq!(styled("abc", 8), CellValue::text("abc"));
    }

    #[test]
    fn test_unstyled_cells_infer_from_payload() {
        assert_eq!(value_of(RawCell::new("A1", "7")), CellValue::Int(7));
        assert_eq!(value_of(RawCell::new("A1", "-0.25")), CellValue::Double(-0.25));
        assert_eq!(value_of(RawCell::new("A1", "hello")), CellValue::text("hello"));
        // A style that declares no number format behaves like no style
        assert_eq!(styled("7", 0), CellValue::Int(7));
    }

    #[test]
    fn test_unstyled_cell_falls_back_to_shared_string_payload() {
        let cell = RawCell::new("A1", "inline junk").with_value("2");
        assert_eq!(value_of(cell), CellValue::text("A1"));

        let cell = RawCell::new("A1", "inline junk").with_value("99");
        assert_eq!(value_of(cell), CellValue::text("inline junk"));
    }

    #[test]
    fn test_style_out_of_range_is_flagged() {
        let (s, f) = (strings(), formats());
        let cell = RawCell::new("C3", "12").with_style(99);
        let typed = resolve(Some(&cell), 2, &CellTables::new(&s, &f));
        assert_eq!(typed.value, CellValue::Int(12));
        assert_eq!(
            typed.debug.unwrap().issue,
            Some(ResolveIssue::StyleOutOfRange { style: 99, len: 11 })
        );
    }

    #[test]
    fn test_explicit_shared_string() {
        let cell = RawCell::new("A2", "2").with_type(CellType::SharedString);
        assert_eq!(value_of(cell), CellValue::text("A1"));
    }

    #[test]
    fn test_bad_shared_string_index_degrades_to_text() {
        let (s, f) = (strings(), formats());
        let tables = CellTables::new(&s, &f);

        let cell = RawCell::new("A2", "17").with_type(CellType::SharedString);
        let typed = resolve(Some(&cell), 0, &tables);
        assert_eq!(typed.value, CellValue::text("17"));
        assert_eq!(
            typed.debug.unwrap().issue,
            Some(ResolveIssue::SharedStringOutOfRange { index: 17, len: 3 })
        );

        let cell = RawCell::new("A2", "x").with_type(CellType::SharedString);
        let typed = resolve(Some(&cell), 0, &tables);
        assert_eq!(typed.value, CellValue::text("x"));
        assert_eq!(
            typed.debug.unwrap().issue,
            Some(ResolveIssue::InvalidSharedStringIndex)
        );
    }

    #[test]
    fn test_explicit_boolean_wins_over_style() {
        let cell = RawCell::new("A1", "1")
            .with_type(CellType::Boolean)
            .with_style(2);
        assert_eq!(value_of(cell), CellValue::Bool(true));
        let cell = RawCell::new("A1", "0").with_type(CellType::Boolean);
        assert_eq!(value_of(cell), CellValue::Bool(false));
        let cell = RawCell::new("A1", "TRUE").with_type(CellType::Boolean);
        assert_eq!(value_of(cell), CellValue::Bool(false));
    }

    #[test]
    fn test_explicit_date_truncates_time() {
        let cell = RawCell::new("A1", "2024-03-15T08:30:00").with_type(CellType::Date);
        assert_eq!(value_of(cell), CellValue::DateTime(datetime(2024, 3, 15, 0)));
        let cell = RawCell::new("A1", "someday").with_type(CellType::Date);
        assert_eq!(value_of(cell), CellValue::text("someday"));
    }

    #[test]
    fn test_explicit_number() {
        let cell = RawCell::new("A1", "3").with_type(CellType::Number);
        assert_eq!(value_of(cell), CellValue::Int(3));
        let cell = RawCell::new("A1", "3.25").with_type(CellType::Number);
        assert_eq!(value_of(cell), CellValue::Double(3.25));
        let cell = RawCell::new("A1", "n/a").with_type(CellType::Number);
        assert_eq!(value_of(cell), CellValue::text("n/a"));
    }

    #[test]
    fn test_explicit_error_is_kept() {
        let cell = RawCell::new("A1", "#DIV/0!").with_type(CellType::Error);
        let value = value_of(cell);
        assert_eq!(value, CellValue::Error("#DIV/0!".into()));
        assert_eq!(value.to_string(), "ERROR: #DIV/0!");
    }

    #[test]
    fn test_explicit_strings_are_not_coerced() {
        let cell = RawCell::new("A1", "42").with_type(CellType::InlineString);
        assert_eq!(value_of(cell), CellValue::text("42"));
        let cell = RawCell::new("A1", "42").with_type(CellType::String);
        assert_eq!(value_of(cell), CellValue::text("42"));
    }

    #[test]
    fn test_debug_fields() {
        let (s, f) = (strings(), formats());
        let cell = RawCell::new("B7", "100").with_style(1);
        let typed = resolve(Some(&cell), 1, &CellTables::new(&s, &f));
        assert_eq!(
            typed,
            TypedCell {
                column: 1,
                value: CellValue::Int(100),
                debug: Some(CellDebug {
                    reference: "B7".into(),
                    raw_text: "100".into(),
                    format_id: Some(1),
                    data_type: None,
                    issue: None,
                }),
            }
        );
    }

    #[test]
    fn test_typed_cell_debug_has_no_format_id() {
        let (s, f) = (strings(), formats());
        let cell = RawCell::new("C4", "1")
            .with_type(CellType::Boolean)
            .with_style(2);
        let debug = resolve(Some(&cell), 2, &CellTables::new(&s, &f))
            .debug
            .unwrap();
        assert_eq!(debug.format_id, None);
        assert_eq!(debug.data_type, Some(CellType::Boolean));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let (s, f) = (strings(), formats());
        let tables = CellTables::new(&s, &f);
        let cell = RawCell::new("D9", "45000.75").with_style(3);
        assert_eq!(resolve(Some(&cell), 3, &tables), resolve(Some(&cell), 3, &tables));
    }

    #[test]
    fn test_resolve_cell_reads_column_from_reference() {
        let (s, f) = (strings(), formats());
        let tables = CellTables::new(&s, &f);
        assert_eq!(resolve_cell(&RawCell::new("AA3", "1"), &tables).unwrap().column, 26);
        assert!(resolve_cell(&RawCell::new("33", "1"), &tables).is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("  -1.5 "), Some(-1.5));
        assert_eq!(parse_number("+3"), Some(3.0));
        assert_eq!(parse_number("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_number("1.5E-3"), Some(0.0015));
        assert_eq!(parse_number("(1,000.5)"), Some(-1000.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("1.2,3"), None);
        assert_eq!(parse_number("(-1)"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number("0x10"), None);
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(whole_number(1.0), Some(1));
        assert_eq!(whole_number(-3.0), Some(-3));
        assert_eq!(whole_number(1.5), None);
        assert_eq!(whole_number(0.1 + 0.2), None);
        // Float noise from stored arithmetic results
        assert_eq!(whole_number(2.9999999999999996), Some(3));
        assert_eq!(whole_number(1e18), Some(1_000_000_000_000_000_000));
        assert_eq!(whole_number(1e19), None);
        assert_eq!(number_value(1e19), CellValue::Double(1e19));
    }
}
