//! Aggregation of measurement streams into result cells.
//!
//! `Summary` is a one-pass (Welford) accumulator. Two summaries over disjoint
//! streams can be merged, and the merge agrees with a single pass over the
//! concatenated stream up to floating-point rounding, whichever way the
//! streams are split or ordered.
//!
//! Dispersion is reported both ways: `std_dev_ns` is the sample standard
//! deviation (n - 1 denominator), `population_std_dev_ns` uses n.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fewest samples `aggregate` accepts.
pub const MIN_SAMPLES: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Combines two summaries (Chan et al. parallel update).
    #[must_use]
    pub fn merge(&self, other: &Summary) -> Summary {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }
        let count = self.count + other.count;
        let (n_a, n_b, n) = (self.count as f64, other.count as f64, count as f64);
        let delta = other.mean - self.mean;
        Summary {
            count,
            mean: self.mean + delta * n_b / n,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / n,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    pub fn population_std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }
}

impl Extend<f64> for Summary {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

impl FromIterator<f64> for Summary {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut summary = Summary::new();
        summary.extend(iter);
        summary
    }
}

/// Aggregated statistics for one `(kind, operation)` pair, in nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCell {
    pub samples: u64,
    pub mean_ns: f64,
    /// Sample standard deviation; 0 for a single sample.
    pub std_dev_ns: f64,
    pub population_std_dev_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
    pub median_ns: f64,
    pub p95_ns: f64,
    pub p99_ns: f64,
    /// Fewer samples than configured because a time limit stopped measurement.
    pub truncated: bool,
}

impl ResultCell {
    #[must_use]
    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }
}

/// Reduces a measurement stream to a `ResultCell`. An empty stream is a
/// harness bug, never a zero-cost result.
pub fn aggregate(measurements: &[Duration]) -> Result<ResultCell> {
    if measurements.len() < MIN_SAMPLES {
        return Err(HarnessError::InsufficientSamples {
            required: MIN_SAMPLES,
            actual: measurements.len(),
        });
    }
    let mut nanos: Vec<f64> = measurements.iter().map(|d| d.as_nanos() as f64).collect();
    let summary: Summary = nanos.iter().copied().collect();
    nanos.sort_by(|a, b| a.total_cmp(b));

    Ok(ResultCell {
        samples: summary.count(),
        mean_ns: summary.mean().unwrap_or_default(),
        std_dev_ns: summary.std_dev().unwrap_or_default(),
        population_std_dev_ns: summary.population_std_dev().unwrap_or_default(),
        min_ns: summary.min().unwrap_or_default(),
        max_ns: summary.max().unwrap_or_default(),
        median_ns: quantile(&nanos, 0.5),
        p95_ns: quantile(&nanos, 0.95),
        p99_ns: quantile(&nanos, 0.99),
        truncated: false,
    })
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let (Some(&lo), Some(&hi)) = (sorted.get(lower), sorted.get(upper)) else {
                return 0.0;
            };
            let weight = pos - lower as f64;
            lo * (1.0 - weight) + hi * weight
        }
    }
}
