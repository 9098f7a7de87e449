//! Time normalization for workout tables.

pub mod normalizer;

pub use normalizer::{normalize_column, normalize_time, Attempt, ElapsedSeconds, TimeStrategy};
