//! Conversion of an arbitrary time column into elapsed seconds.
//!
//! Strategies run in a fixed order and the first [`Attempt::Success`] wins:
//!
//! 1. absolute calendar timestamps, shifted so the earliest is 0
//! 2. plain numbers: minutes when the column max is ≤ 100, otherwise seconds
//! 3. `MM:SS` / `HH:MM:SS` clock strings
//!
//! Numeric and clock values are kept as-is (not shifted to start at 0);
//! durations are always measured as last minus first.

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::{Cell, Column, ColumnKind, Table};
use serde::Serialize;
use std::fmt;

/// Largest column maximum still read as minutes by the numeric strategy.
pub const MINUTES_MAX_VALUE: f64 = 100.0;

/// How an elapsed-seconds series was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStrategy {
    /// Calendar timestamps minus the earliest timestamp
    AbsoluteTimestamps,
    /// Numbers ≤ 100 read as minutes
    NumericMinutes,
    /// Numbers read as seconds
    NumericSeconds,
    /// Colon-delimited clock strings
    ClockStrings,
    /// One sample per second, no time column
    Synthetic,
}

impl fmt::Display for TimeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeStrategy::AbsoluteTimestamps => write!(f, "absolute timestamps"),
            TimeStrategy::NumericMinutes => write!(f, "minutes"),
            TimeStrategy::NumericSeconds => write!(f, "seconds"),
            TimeStrategy::ClockStrings => write!(f, "clock strings"),
            TimeStrategy::Synthetic => write!(f, "1 sample/second"),
        }
    }
}

/// Outcome of a single parsing strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// The strategy understood every value
    Success(ElapsedSeconds),
    /// The strategy does not apply; try the next one
    Unsupported,
}

/// Elapsed seconds for every row of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ElapsedSeconds {
    values: Vec<f64>,
    strategy: TimeStrategy,
}

impl ElapsedSeconds {
    /// Wrap already-computed seconds.
    pub fn new(values: Vec<f64>, strategy: TimeStrategy) -> Self {
        let series = Self { values, strategy };
        if !series.is_monotonic() {
            tracing::warn!(
                "Elapsed seconds ({}) are not monotonic; duration uses last minus first",
                strategy
            );
        }
        series
    }

    /// One sample per second: `0, 1, ..., n - 1`.
    pub fn synthetic(n: usize) -> Self {
        Self {
            values: (0..n).map(|i| i as f64).collect(),
            strategy: TimeStrategy::Synthetic,
        }
    }

    /// Seconds in row order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Strategy that produced the series.
    pub fn strategy(&self) -> TimeStrategy {
        self.strategy
    }

    /// Whether the series was synthesized rather than parsed.
    pub fn is_synthetic(&self) -> bool {
        self.strategy == TimeStrategy::Synthetic
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether values never decrease (ties allowed).
    pub fn is_monotonic(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    /// Last minus first, in seconds; 0 for empty series.
    pub fn span_seconds(&self) -> f64 {
        match (self.values.first(), self.values.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Convert into a numeric table column.
    pub fn to_column(&self, name: impl Into<String>) -> Column {
        Column::numeric(name, &self.values)
    }
}

type Strategy = fn(&Column) -> AnalysisResult<Attempt>;

/// Strategies in the order they are attempted.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("absolute timestamps", parse_absolute),
    ("numeric", parse_numeric),
    ("clock strings", parse_clock),
];

/// Normalize the named time column of `table` into elapsed seconds.
pub fn normalize_time(table: &Table, time_col: &str) -> AnalysisResult<ElapsedSeconds> {
    let column = table
        .column(time_col)
        .ok_or_else(|| AnalysisError::unknown_column(time_col))?;
    normalize_column(column)
}

/// Normalize a time column into elapsed seconds.
pub fn normalize_column(column: &Column) -> AnalysisResult<ElapsedSeconds> {
    if column.is_empty() {
        return Err(AnalysisError::EmptyData(format!(
            "time column '{}' has no rows",
            column.name()
        )));
    }

    for (label, strategy) in STRATEGIES {
        match strategy(column)? {
            Attempt::Success(series) => {
                tracing::debug!(
                    "Time column '{}' parsed via {} strategy as {}",
                    column.name(),
                    label,
                    series.strategy()
                );
                return Ok(series);
            }
            Attempt::Unsupported => {
                tracing::trace!("Time column '{}': {} strategy not applicable", column.name(), label);
            }
        }
    }

    Err(AnalysisError::TimeFormat {
        column: column.name().to_string(),
        reason: "values are not timestamps, numbers, or MM:SS / HH:MM:SS clock strings".to_string(),
    })
}

/// Strategy 1: every value is a calendar timestamp.
fn parse_absolute(column: &Column) -> AnalysisResult<Attempt> {
    let stamps: Option<Vec<_>> = column.cells().iter().map(Cell::as_timestamp).collect();
    let Some(stamps) = stamps else {
        return Ok(Attempt::Unsupported);
    };
    let Some(start) = stamps.iter().min().copied() else {
        return Ok(Attempt::Unsupported);
    };

    let values = stamps
        .iter()
        .map(|ts| (*ts - start).num_milliseconds() as f64 / 1000.0)
        .collect();
    Ok(Attempt::Success(ElapsedSeconds::new(
        values,
        TimeStrategy::AbsoluteTimestamps,
    )))
}

/// Strategy 2: every value is a number; magnitude decides minutes vs seconds.
fn parse_numeric(column: &Column) -> AnalysisResult<Attempt> {
    let numbers: Option<Vec<f64>> = column.cells().iter().map(Cell::as_number).collect();
    let Some(numbers) = numbers else {
        return Ok(Attempt::Unsupported);
    };

    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= MINUTES_MAX_VALUE {
        let values = numbers.iter().map(|m| m * 60.0).collect();
        Ok(Attempt::Success(ElapsedSeconds::new(
            values,
            TimeStrategy::NumericMinutes,
        )))
    } else {
        Ok(Attempt::Success(ElapsedSeconds::new(
            numbers,
            TimeStrategy::NumericSeconds,
        )))
    }
}

/// Strategy 3: `MM:SS` or `HH:MM:SS`, decided by the first present value.
///
/// Once the first value contains a colon, any row that does not parse is fatal.
fn parse_clock(column: &Column) -> AnalysisResult<Attempt> {
    if column.kind() == ColumnKind::Temporal {
        // Only reachable when timestamps are interleaved with missing cells
        return Err(AnalysisError::TimeFormat {
            column: column.name().to_string(),
            reason: "mixed timestamp/missing values".to_string(),
        });
    }

    let first = column.cells().iter().find(|c| !c.is_missing());
    match first {
        Some(cell) if cell.to_text().contains(':') => {}
        _ => return Ok(Attempt::Unsupported),
    }

    let values = column
        .cells()
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            clock_to_seconds(&cell.to_text()).map_err(|reason| AnalysisError::TimeFormat {
                column: column.name().to_string(),
                reason: format!("row {}: {}", row + 1, reason),
            })
        })
        .collect::<AnalysisResult<Vec<f64>>>()?;

    Ok(Attempt::Success(ElapsedSeconds::new(
        values,
        TimeStrategy::ClockStrings,
    )))
}

/// Convert `MM:SS` or `HH:MM:SS` into seconds.
pub fn clock_to_seconds(raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split(':').collect();
    let numbers = parts
        .iter()
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| format!("'{}' is not a valid clock value", raw))
        })
        .collect::<Result<Vec<f64>, String>>();

    match parts.len() {
        2 => {
            let n = numbers?;
            Ok(n[0] * 60.0 + n[1])
        }
        3 => {
            let n = numbers?;
            Ok(n[0] * 3600.0 + n[1] * 60.0 + n[2])
        }
        count => Err(format!(
            "'{}' has {} ':'-separated parts, expected 2 (MM:SS) or 3 (HH:MM:SS)",
            raw, count
        )),
    }
}
