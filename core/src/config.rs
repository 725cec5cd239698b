//! Session configuration.

use crate::error::{HarnessError, Result};
use crate::fixture::MAX_FIXTURE_SIZE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_WARMUP_ITERATIONS: u64 = 10_000;
pub const DEFAULT_MEASUREMENT_ITERATIONS: u64 = 1_000;
pub const DEFAULT_FIXTURE_SIZE: usize = 10_000;

/// Options recognised by a measurement session. Missing fields take their
/// defaults, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Discarded invocations before measuring.
    pub warmup_iterations: u64,
    /// Recorded invocations per scenario.
    pub measurement_iterations: u64,
    /// Element count of every fixture.
    pub fixture_size: usize,
    /// Stop warm-up early once this much time has been spent on it.
    pub warmup_time_ms: Option<u64>,
    /// Wall-clock cap on one scenario's measurement phase.
    pub time_budget_per_scenario_ms: Option<u64>,
    /// Wall-clock cap on the whole session.
    pub session_deadline_ms: Option<u64>,
    /// Build fixtures on scoped threads. Measurement is always sequential.
    pub parallel_fixtures: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: DEFAULT_WARMUP_ITERATIONS,
            measurement_iterations: DEFAULT_MEASUREMENT_ITERATIONS,
            fixture_size: DEFAULT_FIXTURE_SIZE,
            warmup_time_ms: None,
            time_budget_per_scenario_ms: None,
            session_deadline_ms: None,
            parallel_fixtures: false,
        }
    }
}

impl SessionConfig {
    /// Loads a config file; the format follows the extension (`toml`,
    /// `yaml`/`yml` or `json`).
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let config: Self = match ext.as_deref() {
            Some("toml") => toml::from_str(&raw).with_context(|| format!("parse TOML config {}", path.display()))?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&raw).with_context(|| format!("parse YAML config {}", path.display()))?
            }
            Some("json") => {
                serde_json::from_str(&raw).with_context(|| format!("parse JSON config {}", path.display()))?
            }
            _ => anyhow::bail!(
                "unsupported config format for {}; expected .toml, .yaml, .yml or .json",
                path.display()
            ),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.measurement_iterations == 0 {
            return Err(HarnessError::InvalidConfig(
                "measurement_iterations must be greater than 0".to_string(),
            ));
        }
        if self.fixture_size == 0 {
            return Err(HarnessError::InvalidConfig("fixture_size must be greater than 0".to_string()));
        }
        if self.fixture_size > MAX_FIXTURE_SIZE {
            return Err(HarnessError::InvalidConfig(format!(
                "fixture_size {} exceeds the limit of {}",
                self.fixture_size, MAX_FIXTURE_SIZE
            )));
        }
        for (name, value) in [
            ("warmup_time_ms", self.warmup_time_ms),
            ("time_budget_per_scenario_ms", self.time_budget_per_scenario_ms),
            ("session_deadline_ms", self.session_deadline_ms),
        ] {
            if value == Some(0) {
                return Err(HarnessError::InvalidConfig(format!("{} must be greater than 0 when set", name)));
            }
        }
        Ok(())
    }

    pub fn warmup_time(&self) -> Option<Duration> {
        self.warmup_time_ms.map(Duration::from_millis)
    }

    pub fn time_budget_per_scenario(&self) -> Option<Duration> {
        self.time_budget_per_scenario_ms.map(Duration::from_millis)
    }

    pub fn session_deadline(&self) -> Option<Duration> {
        self.session_deadline_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn with_iterations(mut self, warmup: u64, measurement: u64) -> Self {
        self.warmup_iterations = warmup;
        self.measurement_iterations = measurement;
        self
    }

    #[must_use]
    pub fn with_fixture_size(mut self, size: usize) -> Self {
        self.fixture_size = size;
        self
    }
}
