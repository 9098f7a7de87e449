//! Integration test modules.

mod export_test;
mod workout_pipeline_test;
