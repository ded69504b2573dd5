//! Serial date conversion and date/time text parsing
//!
//! Spreadsheets store dates as OLE Automation serials: a day count from
//! 1899-12-30 whose fractional part is the time of day. Workbooks saved with
//! the 1904 date system count from 1904-01-01 instead.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Serials at or beyond these bounds have no calendar representation
const OA_DATE_MIN: f64 = -657_435.0;
const OA_DATE_MAX: f64 = 2_958_466.0;

/// Days between the 1900 and 1904 epochs
const DAYS_1900_TO_1904: f64 = 1462.0;

/// Epoch a workbook counts its serial dates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSystem {
    /// Serial 0 is 1899-12-30 (Windows Excel default)
    #[default]
    Ole1900,
    /// Serial 0 is 1904-01-01 (`date1904` workbooks)
    Mac1904,
}

impl DateSystem {
    /// Pick the system from the workbook's `date1904` flag
    pub fn from_date1904(date1904: bool) -> Self {
        if date1904 {
            DateSystem::Mac1904
        } else {
            DateSystem::Ole1900
        }
    }
}

fn oa_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// Convert an OLE Automation serial to a date/time
///
/// Matches `DateTime.FromOADate`: milliseconds are rounded half away from
/// zero and negative serials keep a positive time of day (-1.25 is
/// 1899-12-29 06:00). Returns `None` outside the representable range.
///
/// # Examples
/// ```
/// use sheetgrid_core::date::{from_oa_date, DateSystem};
///
/// let dt = from_oa_date(2.5, DateSystem::Ole1900).unwrap();
/// assert_eq!(dt.to_string(), "1900-01-01 12:00:00");
/// ```
pub fn from_oa_date(serial: f64, system: DateSystem) -> Option<NaiveDateTime> {
    let serial = match system {
        DateSystem::Ole1900 => serial,
        DateSystem::Mac1904 => serial + DAYS_1900_TO_1904,
    };

    if !serial.is_finite() || serial >= OA_DATE_MAX || serial <= OA_DATE_MIN {
        return None;
    }

    let rounding = if serial >= 0.0 { 0.5 } else { -0.5 };
    let mut millis = (serial * MILLIS_PER_DAY as f64 + rounding) as i64;
    if millis < 0 {
        millis -= (millis % MILLIS_PER_DAY) * 2;
    }

    oa_epoch()?.checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a fractional day count to an elapsed duration
pub fn duration_from_days(days: f64) -> Option<Duration> {
    if !days.is_finite() || days.abs() >= OA_DATE_MAX {
        return None;
    }
    Some(Duration::milliseconds(
        (days * MILLIS_PER_DAY as f64).round() as i64,
    ))
}

/// Parse `[-][d.]h:mm[:ss[.fff]]` text as a duration
///
/// Spans that overflow or reach the serial date limit are rejected.
pub fn parse_duration_text(text: &str) -> Option<Duration> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts = body.split(':');
    let head = parts.next()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: f64 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0.0,
    };
    if parts.next().is_some() || !(0..60).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let (days, hours): (i64, i64) = match head.split_once('.') {
        Some((d, h)) => (d.parse().ok()?, h.parse().ok()?),
        None => (0, head.parse().ok()?),
    };
    if days < 0 || hours < 0 {
        return None;
    }

    let millis = days
        .checked_mul(24)?
        .checked_add(hours)?
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60_000)?
        .checked_add((seconds * 1000.0).round() as i64)?;
    if millis as f64 >= OA_DATE_MAX * MILLIS_PER_DAY as f64 {
        return None;
    }

    let duration = Duration::milliseconds(millis);
    Some(if negative { -duration } else { duration })
}

/// Parse date or date/time text in the forms spreadsheets emit
///
/// Accepts RFC 3339 / ISO 8601 (with or without time, `T` or space
/// separated), `yyyy/mm/dd` and US-style `mm/dd/yyyy`.
pub fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Drop the time-of-day component
pub fn truncate_to_date(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}
