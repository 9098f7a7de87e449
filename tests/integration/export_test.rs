//! Integration tests for exporting analyzed workouts.

use rideload::analysis::{AnalysisOptions, WorkoutAnalysis};
use rideload::export::{export_analysis_csv, export_summary_csv, write_csv_file};
use rideload::table::{read_csv_file, read_csv_str};
use tempfile::TempDir;

fn analyzed(rows: usize) -> WorkoutAnalysis {
    let mut csv = String::from("seconds,watts\n");
    for i in 0..rows {
        csv.push_str(&format!("{},{}\n", 500 + i, 200 + (i % 2) * 20));
    }
    let table = read_csv_str(&csv).unwrap();
    WorkoutAnalysis::run(table, &AnalysisOptions::default(), Some(250.0)).unwrap()
}

#[test]
fn test_exported_table_reads_back() {
    let dir = TempDir::new().unwrap();
    let analysis = analyzed(90);
    let path = dir.path().join("out.csv");

    let csv = export_analysis_csv(&analysis, 3).unwrap();
    write_csv_file(&csv, &path).unwrap();

    let table = read_csv_file(&path).unwrap();
    assert_eq!(table.row_count(), 90);
    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["seconds", "watts", "elapsed_seconds", "rolling_avg", "rolling_avg_4th"]
    );

    // Strict window: first 29 rolling values are empty
    let rolling = table.column("rolling_avg").unwrap();
    assert!(rolling.cells()[28].is_missing());
    assert_eq!(rolling.cells()[29].as_number(), Some(210.0));
}

#[test]
fn test_summary_row_matches_metrics() {
    let analysis = analyzed(90);
    let csv = export_summary_csv(&analysis, 250.0).unwrap();
    let table = read_csv_str(&csv).unwrap();

    let np_display = table.column("np_display").unwrap().cells()[0].as_number();
    assert_eq!(np_display, Some(analysis.metrics.display_normalized_power() as f64));

    let strategy = table.column("time_strategy").unwrap().cells()[0].to_text();
    assert_eq!(strategy, "seconds");
}
