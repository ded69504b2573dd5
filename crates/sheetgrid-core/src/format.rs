//! Number-format classification
//!
//! A cell's style points at a number-format id. Ids below 50 are the
//! built-in formats every spreadsheet application knows; ids from 164 up are
//! defined by the workbook itself and say nothing about the value's type.

/// First id available to workbook-defined formats
pub const FIRST_CUSTOM_FORMAT_ID: u32 = 164;

// Built-in format IDs
/// 0 - General
pub const ID_GENERAL: u32 = 0;
/// 1 - 0
pub const ID_NUMBER_INT: u32 = 1;
/// 2 - 0.00
pub const ID_NUMBER_DEC2: u32 = 2;
/// 3 - #,##0
pub const ID_NUMBER_SEP: u32 = 3;
/// 4 - #,##0.00
pub const ID_NUMBER_SEP_DEC2: u32 = 4;
/// 9 - 0%
pub const ID_PERCENT_INT: u32 = 9;
/// 10 - 0.00%
pub const ID_PERCENT_DEC2: u32 = 10;
/// 11 - 0.00E+00
pub const ID_SCIENTIFIC: u32 = 11;
/// 12 - # ?/?
pub const ID_FRACTION: u32 = 12;
/// 13 - # ??/??
pub const ID_FRACTION2: u32 = 13;
/// 14 - mm-dd-yy
pub const ID_DATE_SHORT: u32 = 14;
/// 17 - mmm-yy
pub const ID_DATE_MONTH_YEAR: u32 = 17;
/// 18 - h:mm AM/PM
pub const ID_TIME_AMPM: u32 = 18;
/// 21 - h:mm:ss
pub const ID_TIME_24H_SEC: u32 = 21;
/// 22 - m/d/yy h:mm
pub const ID_DATETIME: u32 = 22;
/// 37 - #,##0 ;(#,##0)
pub const ID_ACCOUNTING_INT: u32 = 37;
/// 40 - #,##0.00;[Red](#,##0.00)
pub const ID_ACCOUNTING_DEC2_RED: u32 = 40;
/// 44 - _("$"* #,##0.00_)
pub const ID_ACCOUNTING_CURRENCY: u32 = 44;
/// 45 - mm:ss
pub const ID_MINUTES_SECONDS: u32 = 45;
/// 46 - [h]:mm:ss
pub const ID_ELAPSED_HOURS: u32 = 46;
/// 47 - mmss.0
pub const ID_MINUTES_SECONDS_TENTHS: u32 = 47;
/// 48 - ##0.0E+0
pub const ID_SCIENTIFIC_ENG: u32 = 48;
/// 49 - @
pub const ID_TEXT: u32 = 49;

/// What a number format says about the value behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCategory {
    /// General format; the raw text is kept as is
    General,
    /// Plain decimal (`0`, `0.00`)
    Decimal,
    /// Decimal with group separators (`#,##0`, accounting-style negatives)
    Thousands,
    /// Percentage (`0%`)
    Percentage,
    /// Scientific notation
    Scientific,
    /// Fraction display (`# ?/?`); the value is still a decimal
    Fraction,
    /// Calendar date without time
    DateOnly,
    /// Calendar date with time
    DateTime,
    /// Clock time
    TimeOfDay,
    /// Elapsed time (`[h]:mm:ss`, `mm:ss`)
    Duration,
    /// Text (`@`)
    Text,
    /// Currency accounting
    Accounting,
    /// Workbook-defined format with no known category
    Custom,
}

impl FormatCategory {
    /// Classify a number-format id
    ///
    /// # Examples
    /// ```
    /// use sheetgrid_core::FormatCategory;
    ///
    /// assert_eq!(FormatCategory::classify(14), FormatCategory::DateOnly);
    /// assert_eq!(FormatCategory::classify(200), FormatCategory::Custom);
    /// assert_eq!(FormatCategory::classify(7), FormatCategory::General);
    /// ```
    pub fn classify(id: u32) -> Self {
        match id {
            ID_GENERAL => FormatCategory::General,
            ID_NUMBER_INT | ID_NUMBER_DEC2 => FormatCategory::Decimal,
            ID_NUMBER_SEP | ID_NUMBER_SEP_DEC2 => FormatCategory::Thousands,
            ID_PERCENT_INT | ID_PERCENT_DEC2 => FormatCategory::Percentage,
            ID_SCIENTIFIC | ID_SCIENTIFIC_ENG => FormatCategory::Scientific,
            ID_FRACTION | ID_FRACTION2 => FormatCategory::Fraction,
            ID_DATE_SHORT..=ID_DATE_MONTH_YEAR => FormatCategory::DateOnly,
            ID_TIME_AMPM..=ID_TIME_24H_SEC => FormatCategory::TimeOfDay,
            ID_DATETIME => FormatCategory::DateTime,
            ID_ACCOUNTING_INT..=ID_ACCOUNTING_DEC2_RED => FormatCategory::Thousands,
            ID_ACCOUNTING_CURRENCY => FormatCategory::Accounting,
            ID_MINUTES_SECONDS..=ID_MINUTES_SECONDS_TENTHS => FormatCategory::Duration,
            ID_TEXT => FormatCategory::Text,
            id if id >= FIRST_CUSTOM_FORMAT_ID => FormatCategory::Custom,
            _ => FormatCategory::General,
        }
    }

    /// Formats whose value is a plain number
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FormatCategory::Decimal
                | FormatCategory::Thousands
                | FormatCategory::Percentage
                | FormatCategory::Scientific
                | FormatCategory::Accounting
        )
    }

    /// Formats whose value is a serial date
    pub fn is_date(&self) -> bool {
        matches!(self, FormatCategory::DateOnly | FormatCategory::DateTime)
    }

    /// Formats whose value is a day count read as elapsed time
    pub fn is_duration(&self) -> bool {
        matches!(self, FormatCategory::TimeOfDay | FormatCategory::Duration)
    }
}
