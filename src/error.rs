//! Analysis error types.

use thiserror::Error;

/// Errors that abort the resolve → normalize → compute pipeline.
///
/// Positional column fallback is not an error; see
/// [`crate::columns::ResolverNotice`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required column is absent or an override names an unknown column.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The time column could not be interpreted.
    #[error("Unrecognized time format in column '{column}': {reason}")]
    TimeFormat { column: String, reason: String },

    /// FTP or another calculation parameter is invalid.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Nothing left to average.
    #[error("Insufficient data: {0}")]
    EmptyData(String),
}

impl AnalysisError {
    /// Schema error for a column name that does not exist in the table.
    pub fn unknown_column(name: &str) -> Self {
        Self::Schema(format!("column '{}' not found in table", name))
    }
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Reject FTP values that would make TSS undefined.
pub fn validate_ftp(ftp: Option<f64>) -> AnalysisResult<f64> {
    match ftp {
        None => Err(AnalysisError::InvalidParameter("FTP is required".to_string())),
        Some(v) if !v.is_finite() || v <= 0.0 => Err(AnalysisError::InvalidParameter(format!(
            "FTP must be a positive number, got {}",
            v
        ))),
        Some(v) => Ok(v),
    }
}
