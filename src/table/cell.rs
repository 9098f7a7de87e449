//! Typed cell values and the parsers used for column type inference.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// Tokens read as a missing value (compared case-insensitively after trimming).
pub const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "-"];

/// Naive datetime layouts accepted as calendar timestamps.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts (interpreted as midnight UTC).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A single table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Empty or one of the [`MISSING_TOKENS`]
    Missing,
    /// Finite number
    Number(f64),
    /// Free text, kept verbatim (trimmed)
    Text(String),
    /// Calendar timestamp, normalized to UTC
    Timestamp(DateTime<Utc>),
}

impl Cell {
    /// Whether this cell holds no value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Coerce to a finite number.
    ///
    /// Text is parsed leniently; timestamps never coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => parse_number(s),
            Cell::Missing | Cell::Timestamp(_) => None,
        }
    }

    /// Coerce to a calendar timestamp.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            Cell::Text(s) => parse_timestamp(s),
            Cell::Missing | Cell::Number(_) => None,
        }
    }

    /// Textual form used by clock-string parsing and CSV export.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every present value is a number (also used for all-missing columns)
    Numeric,
    /// Every present value is a calendar timestamp
    Temporal,
    /// Anything else
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Temporal => write!(f, "temporal"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// Check whether a raw field is a missing-value token.
pub fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Parse a finite number, ignoring surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a calendar timestamp.
///
/// A date part is required: bare clock strings such as `01:02:03` and bare
/// numbers are rejected so they reach the clock and numeric strategies.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim().trim_matches('"');
    if s.is_empty() || parse_number(s).is_some() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Infer the kind of a column from raw fields and convert them to cells.
pub fn infer_cells(raw: &[String]) -> (ColumnKind, Vec<Cell>) {
    let present: Vec<&str> = raw
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !is_missing_token(s))
        .collect();

    if present.iter().all(|s| parse_number(s).is_some()) {
        let cells = raw
            .iter()
            .map(|s| match parse_number(s) {
                Some(v) if !is_missing_token(s) => Cell::Number(v),
                _ => Cell::Missing,
            })
            .collect();
        return (ColumnKind::Numeric, cells);
    }

    if present.iter().all(|s| parse_timestamp(s).is_some()) {
        let cells = raw
            .iter()
            .map(|s| match parse_timestamp(s) {
                Some(ts) if !is_missing_token(s) => Cell::Timestamp(ts),
                _ => Cell::Missing,
            })
            .collect();
        return (ColumnKind::Temporal, cells);
    }

    let cells = raw
        .iter()
        .map(|s| {
            if is_missing_token(s) {
                Cell::Missing
            } else {
                Cell::Text(s.trim().to_string())
            }
        })
        .collect();
    (ColumnKind::Text, cells)
}
