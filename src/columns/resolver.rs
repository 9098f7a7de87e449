//! Heuristic power/time column detection.
//!
//! Rules, in priority order:
//! 1. An explicit override name (must exist in the table).
//! 2. The first column, by position, whose lowercased name contains any keyword.
//! 3. A positional default: power → column 1 (column 0 for single-column
//!    tables), time → column 0. Positional picks produce a [`ResolverNotice`].

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default substrings identifying a power column.
pub const DEFAULT_POWER_KEYWORDS: &[&str] = &["power", "watts", "watt", "output", "pwr"];

/// Default substrings identifying a time column.
pub const DEFAULT_TIME_KEYWORDS: &[&str] = &["time", "seconds", "minutes", "elapsed", "sec", "min"];

/// Keyword lists used for detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
    /// Substrings matched against power column names
    pub power: Vec<String>,
    /// Substrings matched against time column names
    pub time: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            power: DEFAULT_POWER_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            time: DEFAULT_TIME_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Column names chosen explicitly by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOverrides {
    pub power: Option<String>,
    pub time: Option<String>,
}

/// What a column is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Power,
    Time,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Power => write!(f, "power"),
            ColumnRole::Time => write!(f, "time"),
        }
    }
}

/// How a column was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Name contained this keyword
    Keyword(String),
    /// Picked by position because nothing matched
    Fallback,
    /// Named explicitly by the caller
    Override,
}

/// A resolved column reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    /// Column name
    pub name: String,
    /// Column position in the table
    pub index: usize,
    /// Selection rule that produced it
    pub matched_by: MatchKind,
}

impl ResolvedColumn {
    /// True unless the column was a positional guess.
    pub fn is_confident(&self) -> bool {
        !matches!(self.matched_by, MatchKind::Fallback)
    }
}

/// Advisory, non-fatal messages for the host to surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolverNotice {
    /// No name matched; a positional default was used
    PositionalFallback {
        role: ColumnRole,
        column: String,
        index: usize,
    },
    /// The time column is unusable, one sample per second was assumed
    SyntheticTiming { reason: String },
}

impl fmt::Display for ResolverNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverNotice::PositionalFallback { role, column, index } => write!(
                f,
                "No {} column matched by name; using column {} ('{}')",
                role, index, column
            ),
            ResolverNotice::SyntheticTiming { reason } => {
                write!(f, "Assuming one sample per second: {}", reason)
            }
        }
    }
}

/// Result of column resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSelection {
    /// Column holding power samples
    pub power: ResolvedColumn,
    /// Column holding timestamps, absent when synthetic timing is used
    pub time: Option<ResolvedColumn>,
    /// Advisory notices gathered during resolution
    pub notices: Vec<ResolverNotice>,
}

impl ColumnSelection {
    /// Drop the time column in favour of one-sample-per-second timing.
    pub fn into_synthetic(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::info!("Using synthetic timing: {}", reason);
        self.time = None;
        self.notices.push(ResolverNotice::SyntheticTiming { reason });
        self
    }

    /// True when every column was chosen by name or override.
    pub fn is_confident(&self) -> bool {
        self.power.is_confident() && self.time.as_ref().map_or(true, ResolvedColumn::is_confident)
    }
}

/// Find the first column (by position) whose lowercased name contains a keyword.
///
/// Returns the column index and the first keyword, in list order, it contains.
pub fn match_column<S: AsRef<str>>(table: &Table, keywords: &[S]) -> Option<(usize, String)> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    table.column_names().enumerate().find_map(|(index, name)| {
        let lower = name.to_lowercase();
        keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(|k| (index, k.clone()))
    })
}

/// Resolve power and time columns by keyword with positional fallback.
pub fn resolve<S: AsRef<str>>(
    table: &Table,
    power_keywords: &[S],
    time_keywords: &[S],
) -> AnalysisResult<ColumnSelection> {
    let mut notices = Vec::new();
    let power = detect(table, ColumnRole::Power, power_keywords, None, &mut notices)?;
    let time = detect(table, ColumnRole::Time, time_keywords, None, &mut notices)?;

    Ok(ColumnSelection {
        power,
        time: Some(time),
        notices,
    })
}

/// Resolve columns honoring explicit overrides before keyword detection.
pub fn resolve_with(
    table: &Table,
    keywords: &Keywords,
    overrides: &ColumnOverrides,
) -> AnalysisResult<ColumnSelection> {
    let mut notices = Vec::new();
    let power = detect(
        table,
        ColumnRole::Power,
        &keywords.power,
        overrides.power.as_deref(),
        &mut notices,
    )?;
    let time = detect(
        table,
        ColumnRole::Time,
        &keywords.time,
        overrides.time.as_deref(),
        &mut notices,
    )?;

    Ok(ColumnSelection {
        power,
        time: Some(time),
        notices,
    })
}

fn detect<S: AsRef<str>>(
    table: &Table,
    role: ColumnRole,
    keywords: &[S],
    explicit: Option<&str>,
    notices: &mut Vec<ResolverNotice>,
) -> AnalysisResult<ResolvedColumn> {
    if table.column_count() == 0 {
        return Err(AnalysisError::Schema(format!(
            "table has no columns to use as the {} column",
            role
        )));
    }

    if let Some(name) = explicit {
        let index = table
            .index_of(name)
            .ok_or_else(|| AnalysisError::unknown_column(name))?;
        tracing::debug!("Using {} column '{}' (override)", role, name);
        return Ok(ResolvedColumn {
            name: name.to_string(),
            index,
            matched_by: MatchKind::Override,
        });
    }

    if let Some((index, keyword)) = match_column(table, keywords) {
        let name = table.column_at(index).map(|c| c.name().to_string()).unwrap_or_default();
        tracing::debug!("Using {} column '{}' (matched '{}')", role, name, keyword);
        return Ok(ResolvedColumn {
            name,
            index,
            matched_by: MatchKind::Keyword(keyword),
        });
    }

    let index = match role {
        ColumnRole::Power if table.column_count() >= 2 => 1,
        _ => 0,
    };
    let name = table.column_at(index).map(|c| c.name().to_string()).unwrap_or_default();
    tracing::warn!("No {} column matched by name, falling back to '{}'", role, name);
    notices.push(ResolverNotice::PositionalFallback {
        role,
        column: name.clone(),
        index,
    });

    Ok(ResolvedColumn {
        name,
        index,
        matched_by: MatchKind::Fallback,
    })
}
