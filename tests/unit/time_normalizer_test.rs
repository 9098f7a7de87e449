//! Unit tests for elapsed-seconds normalization.

use rideload::table::read_csv_str;
use rideload::timing::{normalize_time, TimeStrategy};
use rideload::AnalysisError;

#[test]
fn test_minutes_times_sixty_for_every_row() {
    let minutes = [0.0, 0.25, 1.0, 12.5, 47.75, 99.0, 100.0];
    let mut csv = String::from("minutes\n");
    for m in minutes {
        csv.push_str(&format!("{}\n", m));
    }
    let table = read_csv_str(&csv).unwrap();
    let series = normalize_time(&table, "minutes").unwrap();

    assert_eq!(series.strategy(), TimeStrategy::NumericMinutes);
    for (seconds, m) in series.values().iter().zip(minutes) {
        assert_eq!(*seconds, m * 60.0);
    }
}

#[test]
fn test_absolute_timestamps_start_at_zero() {
    let csv = "\
timestamp
2023-11-05T07:30:00Z
2023-11-05T07:30:01Z
2023-11-05T07:30:02.500Z
2023-11-05T07:31:00Z
";
    let table = read_csv_str(csv).unwrap();
    let series = normalize_time(&table, "timestamp").unwrap();

    assert_eq!(series.strategy(), TimeStrategy::AbsoluteTimestamps);
    assert_eq!(series.values()[0], 0.0);
    assert_eq!(series.values(), &[0.0, 1.0, 2.5, 60.0]);
}

#[test]
fn test_timestamps_shift_to_earliest_not_first() {
    let csv = "time\n2024-01-01 10:00:05\n2024-01-01 10:00:00\n2024-01-01 10:00:10\n";
    let table = read_csv_str(csv).unwrap();
    let series = normalize_time(&table, "time").unwrap();

    assert_eq!(series.values(), &[5.0, 0.0, 10.0]);
    assert!(!series.is_monotonic());
}

#[test]
fn test_clock_strings() {
    let csv = "Time\n02:03\n01:02:03\n";
    let table = read_csv_str(csv).unwrap();
    let series = normalize_time(&table, "Time").unwrap();

    assert_eq!(series.strategy(), TimeStrategy::ClockStrings);
    assert_eq!(series.values(), &[123.0, 3723.0]);
}

#[test]
fn test_na_in_numeric_column_is_time_format_error() {
    let csv = "seconds\n0\n1\nN/A\n3\n";
    let table = read_csv_str(csv).unwrap();
    let err = normalize_time(&table, "seconds").unwrap_err();

    match err {
        AnalysisError::TimeFormat { column, .. } => assert_eq!(column, "seconds"),
        other => panic!("expected TimeFormat, got {other}"),
    }
}

#[test]
fn test_missing_clock_value_is_fatal() {
    let csv = "Time\n00:01\n\"\"\n00:03\n";
    let table = read_csv_str(csv).unwrap();

    assert!(matches!(
        normalize_time(&table, "Time"),
        Err(AnalysisError::TimeFormat { .. })
    ));
}
