//! CSV export of analyzed workouts.

use crate::analysis::WorkoutAnalysis;
use crate::table::{Cell, Table};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    NoData,

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Quote a field if it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_cell(cell: &Cell, precision: Option<usize>) -> String {
    match (cell, precision) {
        (Cell::Number(v), Some(p)) => format!("{:.*}", p, v),
        _ => escape_field(&cell.to_text()),
    }
}

/// Export the augmented table to CSV.
///
/// Columns listed in `rounded` are written with `precision` decimal places;
/// all others are written as read.
pub fn export_table_csv(table: &Table, rounded: &[&str], precision: usize) -> Result<String, ExportError> {
    if table.row_count() == 0 {
        return Err(ExportError::NoData);
    }

    let mut output = Vec::new();

    // Write header
    let header: Vec<String> = table.column_names().map(escape_field).collect();
    writeln!(output, "{}", header.join(",")).map_err(|e| ExportError::WriteFailed(e.to_string()))?;

    let precisions: Vec<Option<usize>> = table
        .column_names()
        .map(|name| rounded.contains(&name).then_some(precision))
        .collect();

    // Write data rows
    for row in 0..table.row_count() {
        let fields: Vec<String> = table
            .columns()
            .iter()
            .zip(&precisions)
            .map(|(column, precision)| format_cell(&column.cells()[row], *precision))
            .collect();
        writeln!(output, "{}", fields.join(",")).map_err(|e| ExportError::WriteFailed(e.to_string()))?;
    }

    String::from_utf8(output).map_err(|e| ExportError::WriteFailed(e.to_string()))
}

/// Export the analyzed table, rounding the derived columns.
pub fn export_analysis_csv(analysis: &WorkoutAnalysis, precision: usize) -> Result<String, ExportError> {
    let derived = [
        analysis.derived.elapsed_seconds.as_str(),
        analysis.derived.rolling_avg.as_str(),
        analysis.derived.rolling_avg_4th.as_str(),
    ];
    export_table_csv(&analysis.table, &derived, precision)
}

/// Export a one-row workout summary to CSV.
pub fn export_summary_csv(analysis: &WorkoutAnalysis, ftp: f64) -> Result<String, ExportError> {
    let mut output = Vec::new();
    let metrics = &analysis.metrics;

    // Write header
    writeln!(
        output,
        "samples,power_column,time_column,time_strategy,duration_hours,avg_power,normalized_power,intensity_factor,tss,np_display,tss_display,ftp"
    )
    .map_err(|e| ExportError::WriteFailed(e.to_string()))?;

    // Write data row
    writeln!(
        output,
        "{},{},{},{},{:.4},{:.1},{:.2},{:.3},{:.2},{},{},{}",
        analysis.table.row_count(),
        escape_field(&analysis.selection.power.name),
        analysis
            .selection
            .time
            .as_ref()
            .map_or(String::new(), |t| escape_field(&t.name)),
        analysis.time_strategy,
        metrics.duration_hours,
        metrics.average_power,
        metrics.normalized_power,
        metrics.intensity_factor,
        metrics.tss,
        metrics.display_normalized_power(),
        metrics.display_tss(),
        ftp,
    )
    .map_err(|e| ExportError::WriteFailed(e.to_string()))?;

    String::from_utf8(output).map_err(|e| ExportError::WriteFailed(e.to_string()))
}

/// Write CSV content to a file.
pub fn write_csv_file(content: &str, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, content)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Default export filename next to the input: `<stem>_analyzed.csv`.
pub fn generate_csv_filename(input: &Path) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workout");
    format!("{}_analyzed.csv", stem)
}
