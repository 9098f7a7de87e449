//! In-memory tabular data read from workout exports.
//!
//! A [`Table`] is an ordered list of uniquely named, equal-length columns.
//! Tables are never mutated in place: derived columns are attached with
//! [`Table::with_column`], which consumes the table and returns a new one.

pub mod cell;
pub mod reader;

pub use cell::{Cell, ColumnKind};
pub use reader::{read_csv_file, read_csv_str};

use thiserror::Error;

/// Errors raised while reading or assembling a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(csv::Error),

    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("Malformed CSV at line {line}: expected {expected} fields, found {found}")]
    Malformed {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column '{column}' has {found} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// A named column of typed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<Cell>,
}

impl Column {
    /// Build a column from raw text fields, inferring its kind.
    pub fn from_raw(name: impl Into<String>, raw: &[String]) -> Self {
        let (kind, cells) = cell::infer_cells(raw);
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Build a numeric column from values; non-finite values become missing.
    pub fn numeric(name: impl Into<String>, values: &[f64]) -> Self {
        Self::from_optional(name, values.iter().map(|v| Some(*v)))
    }

    /// Build a numeric column where `None` marks a missing value.
    pub fn from_optional(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let cells = values
            .into_iter()
            .map(|v| match v {
                Some(v) if v.is_finite() => Cell::Number(v),
                _ => Cell::Missing,
            })
            .collect();
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
            cells,
        }
    }

    /// Column name as it appears in the header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inferred column kind.
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// All cells in row order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An ordered collection of equal-length columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Assemble a table, checking names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut table = Self {
            columns: Vec::with_capacity(columns.len()),
            row_count,
        };
        for column in columns {
            table = table.with_column(column)?;
        }
        Ok(table)
    }

    /// Return a new table with `column` appended.
    pub fn with_column(mut self, column: Column) -> TableResult<Self> {
        if self.columns.is_empty() {
            self.row_count = column.len();
        }
        if column.len() != self.row_count {
            return Err(TableError::LengthMismatch {
                column: column.name,
                expected: self.row_count,
                found: column.cells.len(),
            });
        }
        if self.index_of(&column.name).is_some() {
            return Err(TableError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(self)
    }

    /// First name based on `base` that is not already taken (`base`, `base_2`, ...).
    pub fn unique_column_name(&self, base: &str) -> String {
        if self.index_of(base).is_none() {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}_{}", base, n))
            .find(|candidate| self.index_of(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// Position of the column named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column by position.
    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}
