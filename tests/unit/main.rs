//! Unit test modules.

mod metrics_test;
mod time_normalizer_test;
