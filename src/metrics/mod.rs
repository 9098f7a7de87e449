//! Normalized Power and Training Stress Score.

pub mod calculator;
pub mod smoothing;

pub use calculator::{
    compute_metrics, duration_hours, training_stress_score, EngineOutput, MetricResult,
    PowerMetricEngine, SmoothedPower,
};
pub use smoothing::{RollingAverage, WindowPolicy, NP_WINDOW_SAMPLES};
