//! Rolling-window power smoothing.
//!
//! The Normalized Power pipeline smooths power with a trailing 30-sample
//! mean before the fourth-power weighting.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Trailing window length used for Normalized Power.
pub const NP_WINDOW_SAMPLES: usize = 30;

/// How positions without a complete trailing window are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Undefined until `window_size` present samples fill the window
    #[default]
    Strict,
    /// Mean of whatever present samples the window holds so far
    Lenient,
}

impl std::fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowPolicy::Strict => write!(f, "strict"),
            WindowPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Trailing rolling average over possibly-missing samples.
#[derive(Debug)]
pub struct RollingAverage {
    /// Most recent samples, oldest first
    buffer: VecDeque<Option<f64>>,
    /// Window size in samples
    window_size: usize,
    /// Short-window handling
    policy: WindowPolicy,
}

impl RollingAverage {
    /// Create a rolling average with the given window size.
    pub fn new(window_size: usize, policy: WindowPolicy) -> Self {
        Self {
            buffer: VecDeque::with_capacity(window_size),
            window_size,
            policy,
        }
    }

    /// Create a 30-sample rolling average (for Normalized Power calculation).
    pub fn thirty_second(policy: WindowPolicy) -> Self {
        Self::new(NP_WINDOW_SAMPLES, policy)
    }

    /// Add a sample (`None` = missing) and return the current average.
    pub fn add(&mut self, value: Option<f64>) -> Option<f64> {
        self.buffer.push_back(value);

        // Remove oldest if over window size
        if self.buffer.len() > self.window_size {
            self.buffer.pop_front();
        }

        self.average()
    }

    /// Get the current average without adding a value.
    pub fn average(&self) -> Option<f64> {
        let (sum, present) = self
            .buffer
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

        match self.policy {
            WindowPolicy::Strict if !self.is_full() || present < self.window_size => None,
            _ if present == 0 => None,
            _ => Some(sum / present as f64),
        }
    }

    /// Check if the buffer is full (has enough samples for a valid average).
    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.window_size
    }

    /// Reset the rolling average.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Get the number of samples in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Trailing rolling mean for every position of `samples`.
pub fn rolling_mean(samples: &[Option<f64>], window_size: usize, policy: WindowPolicy) -> Vec<Option<f64>> {
    let mut avg = RollingAverage::new(window_size, policy);
    samples.iter().map(|s| avg.add(*s)).collect()
}

/// Raise each defined value to the fourth power.
pub fn fourth_powers(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(|x| x.powi(4))).collect()
}
