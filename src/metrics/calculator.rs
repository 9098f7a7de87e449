//! Normalized Power and Training Stress Score calculation.
//!
//! NP  = ⁴√ mean( rolling_mean_30(power)⁴ )
//! TSS = NP² × hours / FTP² × 100

use crate::error::{validate_ftp, AnalysisError, AnalysisResult};
use crate::metrics::smoothing::{fourth_powers, rolling_mean, WindowPolicy, NP_WINDOW_SAMPLES};
use crate::timing::ElapsedSeconds;
use serde::Serialize;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Workout metrics, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricResult {
    /// Normalized Power in watts
    pub normalized_power: f64,
    /// Training Stress Score
    pub tss: f64,
    /// Intensity Factor (NP / FTP)
    pub intensity_factor: f64,
    /// Duration used for TSS, in hours
    pub duration_hours: f64,
    /// Mean of present power samples
    pub average_power: f64,
    /// Number of rolling-window positions that contributed to NP
    pub window_count: usize,
}

impl MetricResult {
    /// Normalized Power rounded up for display.
    pub fn display_normalized_power(&self) -> u32 {
        self.normalized_power.ceil() as u32
    }

    /// TSS rounded up for display.
    pub fn display_tss(&self) -> u32 {
        self.tss.ceil() as u32
    }
}

/// Per-sample smoothing output, kept for the derived table columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothedPower {
    /// Trailing rolling mean per sample
    pub rolling_avg: Vec<Option<f64>>,
    /// Rolling mean raised to the fourth power
    pub rolling_avg_4th: Vec<Option<f64>>,
}

/// Metrics together with the series they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub metrics: MetricResult,
    pub smoothed: SmoothedPower,
}

/// Computes NP/TSS from a power series and its elapsed seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerMetricEngine {
    /// Rolling window length in samples
    window_size: usize,
    /// Short-window handling
    policy: WindowPolicy,
}

impl Default for PowerMetricEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerMetricEngine {
    /// Standard 30-sample strict engine.
    pub fn new() -> Self {
        Self {
            window_size: NP_WINDOW_SAMPLES,
            policy: WindowPolicy::Strict,
        }
    }

    /// Override the rolling window length.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Override the short-window policy.
    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Compute NP and TSS.
    pub fn compute_metrics(
        &self,
        power: &[Option<f64>],
        elapsed: &ElapsedSeconds,
        ftp: f64,
    ) -> AnalysisResult<MetricResult> {
        self.compute_detailed(power, elapsed, ftp).map(|out| out.metrics)
    }

    /// Compute NP and TSS, also returning the smoothed series.
    pub fn compute_detailed(
        &self,
        power: &[Option<f64>],
        elapsed: &ElapsedSeconds,
        ftp: f64,
    ) -> AnalysisResult<EngineOutput> {
        let ftp = validate_ftp(Some(ftp))?;
        if self.window_size == 0 {
            return Err(AnalysisError::InvalidParameter(
                "rolling window size must be at least 1".to_string(),
            ));
        }
        if power.len() != elapsed.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "power has {} samples but elapsed seconds has {}",
                power.len(),
                elapsed.len()
            )));
        }
        if power.is_empty() {
            return Err(AnalysisError::EmptyData("power series is empty".to_string()));
        }

        let present: Vec<f64> = power.iter().flatten().copied().collect();
        if present.is_empty() {
            return Err(AnalysisError::EmptyData(
                "every power sample is missing".to_string(),
            ));
        }
        let average_power = present.iter().sum::<f64>() / present.len() as f64;

        let rolling_avg = rolling_mean(power, self.window_size, self.policy);
        let rolling_avg_4th = fourth_powers(&rolling_avg);

        let defined: Vec<f64> = rolling_avg_4th.iter().flatten().copied().collect();
        if defined.is_empty() {
            return Err(AnalysisError::EmptyData(format!(
                "{} samples never fill a {}-sample {} window",
                power.len(),
                self.window_size,
                self.policy
            )));
        }

        let mean_fourth = defined.iter().sum::<f64>() / defined.len() as f64;
        // sqrt is exactly rounded, powf(0.25) is not
        let normalized_power = mean_fourth.sqrt().sqrt();

        let duration_hours = duration_hours(elapsed);
        let tss = training_stress_score(normalized_power, duration_hours, ftp);

        let metrics = MetricResult {
            normalized_power,
            tss,
            intensity_factor: normalized_power / ftp,
            duration_hours,
            average_power,
            window_count: defined.len(),
        };
        tracing::debug!(
            "NP {:.2} W over {} windows, {:.4} h, TSS {:.2}",
            metrics.normalized_power,
            metrics.window_count,
            metrics.duration_hours,
            metrics.tss
        );

        Ok(EngineOutput {
            metrics,
            smoothed: SmoothedPower {
                rolling_avg,
                rolling_avg_4th,
            },
        })
    }
}

/// Compute NP and TSS with the standard strict 30-sample window.
pub fn compute_metrics(
    power: &[Option<f64>],
    elapsed: &ElapsedSeconds,
    ftp: f64,
) -> AnalysisResult<MetricResult> {
    PowerMetricEngine::new().compute_metrics(power, elapsed, ftp)
}

/// Workout duration in hours.
///
/// Synthetic timing counts samples (N / 3600); parsed timing uses last minus
/// first, clamped at 0 for series that run backwards.
pub fn duration_hours(elapsed: &ElapsedSeconds) -> f64 {
    if elapsed.is_synthetic() {
        return elapsed.len() as f64 / SECONDS_PER_HOUR;
    }
    let span = elapsed.span_seconds();
    if span < 0.0 {
        tracing::warn!("Time column ends before it starts; treating duration as 0");
        return 0.0;
    }
    span / SECONDS_PER_HOUR
}

/// TSS = NP² × hours / FTP² × 100.
pub fn training_stress_score(normalized_power: f64, duration_hours: f64, ftp: f64) -> f64 {
    if duration_hours <= 0.0 {
        return 0.0;
    }
    (normalized_power * normalized_power * duration_hours) / (ftp * ftp) * 100.0
}
