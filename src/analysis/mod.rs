//! End-to-end workout analysis: resolve columns, normalize time, compute metrics.
//!
//! Stages run in order and the first error aborts the rest; no partial
//! results are returned. On success the input table comes back with three
//! derived columns appended (elapsed seconds, rolling average, and its
//! fourth power).

use crate::columns::{resolve_with, ColumnOverrides, ColumnSelection, Keywords, MatchKind};
use crate::error::{validate_ftp, AnalysisError, AnalysisResult};
use crate::metrics::calculator::{MetricResult, PowerMetricEngine};
use crate::metrics::smoothing::{WindowPolicy, NP_WINDOW_SAMPLES};
use crate::table::{Cell, Column, Table};
use crate::timing::{normalize_time, ElapsedSeconds, TimeStrategy};

/// Base name of the derived elapsed-seconds column.
pub const ELAPSED_SECONDS_COLUMN: &str = "elapsed_seconds";
/// Base name of the derived rolling-average column.
pub const ROLLING_AVG_COLUMN: &str = "rolling_avg";
/// Base name of the derived fourth-power column.
pub const ROLLING_AVG_4TH_COLUMN: &str = "rolling_avg_4th";

/// Where elapsed time comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingMode {
    /// Use the resolved time column
    #[default]
    Detect,
    /// Ignore time columns and assume one sample per second
    Synthetic,
}

/// Options controlling a single analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Column-name keywords
    pub keywords: Keywords,
    /// Explicit column choices
    pub overrides: ColumnOverrides,
    /// Time source
    pub timing: TimingMode,
    /// Rolling window length in samples
    pub window_size: usize,
    /// Short-window handling
    pub window_policy: WindowPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            keywords: Keywords::default(),
            overrides: ColumnOverrides::default(),
            timing: TimingMode::Detect,
            window_size: NP_WINDOW_SAMPLES,
            window_policy: WindowPolicy::Strict,
        }
    }
}

/// Names of the columns appended to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedColumns {
    pub elapsed_seconds: String,
    pub rolling_avg: String,
    pub rolling_avg_4th: String,
}

/// Result of a successful analysis.
#[derive(Debug, Clone)]
pub struct WorkoutAnalysis {
    /// Input table plus derived columns
    pub table: Table,
    /// Chosen columns and advisory notices
    pub selection: ColumnSelection,
    /// How elapsed time was derived
    pub time_strategy: TimeStrategy,
    /// NP, TSS and friends
    pub metrics: MetricResult,
    /// Names of the appended columns
    pub derived: DerivedColumns,
}

impl WorkoutAnalysis {
    /// Run the full pipeline over `table`.
    pub fn run(table: Table, options: &AnalysisOptions, ftp: Option<f64>) -> AnalysisResult<Self> {
        let ftp = validate_ftp(ftp)?;

        let mut selection = resolve_with(&table, &options.keywords, &options.overrides)?;
        if table.row_count() == 0 {
            return Err(AnalysisError::EmptyData("table has no data rows".to_string()));
        }

        selection = choose_timing(selection, options.timing);

        let elapsed = match &selection.time {
            Some(time) => normalize_time(&table, &time.name)?,
            None => ElapsedSeconds::synthetic(table.row_count()),
        };

        let power = power_samples(&table, &selection.power.name)?;

        let engine = PowerMetricEngine::new()
            .with_window_size(options.window_size)
            .with_policy(options.window_policy);
        let output = engine.compute_detailed(&power, &elapsed, ftp)?;

        tracing::info!(
            "Analyzed {} samples: NP {:.1} W, TSS {:.1} ({} timing)",
            table.row_count(),
            output.metrics.normalized_power,
            output.metrics.tss,
            elapsed.strategy()
        );

        let (table, derived) = append_derived(
            table,
            &elapsed,
            &output.smoothed.rolling_avg,
            &output.smoothed.rolling_avg_4th,
        )?;

        Ok(Self {
            table,
            selection,
            time_strategy: elapsed.strategy(),
            metrics: output.metrics,
            derived,
        })
    }
}

/// Decide between the resolved time column and synthetic timing.
fn choose_timing(selection: ColumnSelection, mode: TimingMode) -> ColumnSelection {
    match mode {
        TimingMode::Synthetic => selection.into_synthetic("synthetic timing requested"),
        TimingMode::Detect => {
            let guessed_onto_power = selection.time.as_ref().is_some_and(|time| {
                time.matched_by == MatchKind::Fallback && time.index == selection.power.index
            });
            if guessed_onto_power {
                selection.into_synthetic("no time column found")
            } else {
                selection
            }
        }
    }
}

/// Extract power samples; missing cells become `None`.
fn power_samples(table: &Table, name: &str) -> AnalysisResult<Vec<Option<f64>>> {
    let column = table
        .column(name)
        .ok_or_else(|| AnalysisError::unknown_column(name))?;

    column
        .cells()
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            Cell::Missing => Ok(None),
            other => other.as_number().map(Some).ok_or_else(|| {
                AnalysisError::Schema(format!(
                    "power column '{}' holds non-numeric value '{}' at row {}",
                    name,
                    other,
                    row + 1
                ))
            }),
        })
        .collect()
}

fn append_derived(
    table: Table,
    elapsed: &ElapsedSeconds,
    rolling_avg: &[Option<f64>],
    rolling_avg_4th: &[Option<f64>],
) -> AnalysisResult<(Table, DerivedColumns)> {
    let to_schema = |e: crate::table::TableError| AnalysisError::Schema(e.to_string());

    let elapsed_name = table.unique_column_name(ELAPSED_SECONDS_COLUMN);
    let table = table
        .with_column(elapsed.to_column(elapsed_name.as_str()))
        .map_err(to_schema)?;

    let avg_name = table.unique_column_name(ROLLING_AVG_COLUMN);
    let table = table
        .with_column(Column::from_optional(avg_name.as_str(), rolling_avg.iter().copied()))
        .map_err(to_schema)?;

    let fourth_name = table.unique_column_name(ROLLING_AVG_4TH_COLUMN);
    let table = table
        .with_column(Column::from_optional(
            fourth_name.as_str(),
            rolling_avg_4th.iter().copied(),
        ))
        .map_err(to_schema)?;

    Ok((
        table,
        DerivedColumns {
            elapsed_seconds: elapsed_name,
            rolling_avg: avg_name,
            rolling_avg_4th: fourth_name,
        },
    ))
}
