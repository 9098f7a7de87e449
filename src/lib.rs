//! RideLoad - Normalized Power and Training Stress Score for exported rides
//!
//! Reads loosely structured workout CSVs (unknown column names, unknown time
//! encodings), finds the power and time columns, normalizes time to elapsed
//! seconds, and computes Normalized Power and TSS against a rider's FTP.

pub mod analysis;
pub mod columns;
pub mod error;
pub mod export;
pub mod metrics;
pub mod storage;
pub mod table;
pub mod timing;

// Re-export commonly used types
pub use analysis::{AnalysisOptions, TimingMode, WorkoutAnalysis};
pub use error::{AnalysisError, AnalysisResult};
pub use metrics::calculator::{MetricResult, PowerMetricEngine};
pub use storage::config::AppConfig;
pub use table::{Column, Table};
