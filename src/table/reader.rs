//! CSV reader producing a typed [`Table`].
//!
//! Records are parsed by the `csv` crate (RFC 4180 quoting, including line
//! breaks inside quoted fields); each column is then typed by
//! [`Column::from_raw`].

use crate::table::{Column, Table, TableError, TableResult};
use std::path::Path;

/// Make header names unique by suffixing repeats with `_2`, `_3`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut name = header.clone();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{}_{}", header, n);
            n += 1;
        }
        seen.push(name);
    }
    seen
}

/// Parse CSV text (header row first) into a table.
pub fn read_csv_str(content: &str) -> TableResult<Table> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let header_record = reader.headers().map_err(csv_error)?.clone();
    if header_record.is_empty() {
        return Err(TableError::MissingHeader);
    }
    let headers = dedupe_headers(header_record.iter().map(|h| h.trim().to_string()).collect());

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        for (column, field) in raw_columns.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns.iter())
        .map(|(name, raw)| Column::from_raw(name, raw))
        .collect();

    let table = Table::new(columns)?;
    tracing::debug!(
        "Read table with {} columns and {} rows",
        table.column_count(),
        table.row_count()
    );
    Ok(table)
}

fn csv_error(err: csv::Error) -> TableError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => TableError::Malformed {
            line: pos.as_ref().map_or(0, |p| p.line() as usize),
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => TableError::Csv(err),
    }
}

/// Read and parse a CSV file.
pub fn read_csv_file(path: &Path) -> TableResult<Table> {
    let content = std::fs::read_to_string(path)?;
    read_csv_str(&content)
}
