//! Integration tests for the full CSV → NP/TSS pipeline.
//!
//! Tests the end-to-end flow:
//! 1. Write a workout export to disk
//! 2. Read it into a table
//! 3. Resolve power/time columns
//! 4. Normalize time
//! 5. Compute NP and TSS

use rideload::analysis::{AnalysisOptions, TimingMode, WorkoutAnalysis};
use rideload::columns::{ColumnOverrides, MatchKind};
use rideload::metrics::WindowPolicy;
use rideload::storage::FtpStore;
use rideload::table::read_csv_file;
use rideload::timing::TimeStrategy;
use rideload::AnalysisError;
use std::path::PathBuf;
use tempfile::TempDir;

/// Simulates an interval session: warm-up, 3 efforts, cool-down (1 sample/s).
fn simulate_intervals(ftp: f64) -> Vec<f64> {
    let mut samples = Vec::new();
    samples.extend(vec![ftp * 0.5; 600]);
    for interval in 0..3 {
        samples.extend(vec![ftp * 1.05; 300]);
        if interval < 2 {
            samples.extend(vec![ftp * 0.5; 180]);
        }
    }
    samples.extend(vec![ftp * 0.4; 300]);
    samples
}

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_peloton_export_with_minutes_category() {
    let dir = TempDir::new().unwrap();
    let power = simulate_intervals(250.0);
    let mut csv = String::from("category,Output - Workout,Cadence - Workout\n");
    for (i, p) in power.iter().enumerate() {
        csv.push_str(&format!("{},{},{}\n", i as f64 / 60.0, p, 90));
    }
    let path = write_csv(&dir, "peloton.csv", &csv);

    let table = read_csv_file(&path).unwrap();
    let analysis = WorkoutAnalysis::run(table, &AnalysisOptions::default(), Some(250.0)).unwrap();

    assert_eq!(analysis.selection.power.name, "Output - Workout");
    assert_eq!(analysis.time_strategy, TimeStrategy::NumericMinutes);

    let metrics = analysis.metrics;
    assert!(metrics.normalized_power > metrics.average_power);
    assert!(metrics.normalized_power < 250.0 * 1.05);
    // Last row is at (n - 1) seconds
    let expected_hours = (power.len() - 1) as f64 / 3600.0;
    assert!((metrics.duration_hours - expected_hours).abs() < 1e-9);
    assert!(metrics.tss > 0.0 && metrics.tss < 100.0);
}

#[test]
fn test_synthetic_timing_scenario() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("Output - Workout\n");
    for _ in 0..60 {
        csv.push_str("100\n");
    }
    let path = write_csv(&dir, "flat.csv", &csv);

    let options = AnalysisOptions {
        timing: TimingMode::Synthetic,
        ..Default::default()
    };
    let analysis = WorkoutAnalysis::run(read_csv_file(&path).unwrap(), &options, Some(100.0)).unwrap();

    assert_eq!(analysis.metrics.normalized_power, 100.0);
    assert!((analysis.metrics.duration_hours - 60.0 / 3600.0).abs() < 1e-12);
    assert_eq!(analysis.metrics.display_normalized_power(), 100);
    assert_eq!(analysis.metrics.display_tss(), 2);
}

#[test]
fn test_timestamp_export() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("timestamp,power,heart_rate\n");
    for i in 0..120 {
        csv.push_str(&format!(
            "2024-06-01 06:{:02}:{:02},{},{}\n",
            i / 60,
            i % 60,
            200,
            140
        ));
    }
    let path = write_csv(&dir, "garmin.csv", &csv);

    let analysis =
        WorkoutAnalysis::run(read_csv_file(&path).unwrap(), &AnalysisOptions::default(), Some(200.0))
            .unwrap();

    assert_eq!(analysis.time_strategy, TimeStrategy::AbsoluteTimestamps);
    let elapsed = analysis.table.column("elapsed_seconds").unwrap();
    assert_eq!(elapsed.cells()[0].as_number(), Some(0.0));
    assert_eq!(elapsed.cells()[119].as_number(), Some(119.0));
    assert!((analysis.metrics.duration_hours - 119.0 / 3600.0).abs() < 1e-12);
}

#[test]
fn test_ftp_zero_blocks_everything() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "ride.csv", "time,power\n0,100\n");

    let err = WorkoutAnalysis::run(read_csv_file(&path).unwrap(), &AnalysisOptions::default(), Some(0.0))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidParameter(_)));
}

#[test]
fn test_na_time_values_abort_pipeline() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("time,power\n");
    for i in 0..40 {
        let t = if i % 7 == 3 { "N/A".to_string() } else { i.to_string() };
        csv.push_str(&format!("{},{}\n", t, 150));
    }
    let path = write_csv(&dir, "gaps.csv", &csv);

    let err = WorkoutAnalysis::run(read_csv_file(&path).unwrap(), &AnalysisOptions::default(), Some(200.0))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::TimeFormat { column, .. } if column == "time"));
}

#[test]
fn test_user_override_and_lenient_window() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("secs,left_power,right_power\n");
    for i in 0..20 {
        csv.push_str(&format!("{},{},{}\n", i + 1000, 100, 110));
    }
    let path = write_csv(&dir, "pedals.csv", &csv);

    let options = AnalysisOptions {
        overrides: ColumnOverrides {
            power: Some("right_power".to_string()),
            time: None,
        },
        window_policy: WindowPolicy::Lenient,
        ..Default::default()
    };
    let analysis = WorkoutAnalysis::run(read_csv_file(&path).unwrap(), &options, Some(200.0)).unwrap();

    assert_eq!(analysis.selection.power.matched_by, MatchKind::Override);
    assert_eq!(analysis.selection.time.as_ref().unwrap().name, "secs");
    assert_eq!(analysis.time_strategy, TimeStrategy::NumericSeconds);
    assert_eq!(analysis.metrics.normalized_power, 110.0);
}

#[test]
fn test_ftp_store_feeds_analysis() {
    let dir = TempDir::new().unwrap();
    let store = FtpStore::new(dir.path().join("ftp.txt"));
    store.save(180.0).unwrap();

    let mut csv = String::from("power\n");
    for _ in 0..3600 {
        csv.push_str("180\n");
    }
    let path = write_csv(&dir, "steady.csv", &csv);

    let ftp = store.load().unwrap();
    let analysis = WorkoutAnalysis::run(read_csv_file(&path).unwrap(), &AnalysisOptions::default(), ftp)
        .unwrap();

    assert_eq!(analysis.time_strategy, TimeStrategy::Synthetic);
    assert_eq!(analysis.metrics.display_tss(), 100);
}
