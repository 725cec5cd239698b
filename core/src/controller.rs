//! Iteration controller: drives one scenario through warm-up and measurement.
//!
//! Warm-up durations are thrown away; only the measurement phase produces
//! samples. Each scenario gets a fresh execution guard, so nothing observed
//! while running one scenario can influence another.

use crate::config::SessionConfig;
use crate::error::HarnessError;
use crate::fixture::Fixture;
use crate::guard::{ExecutionGuard, Sink};
use crate::registry::Workload;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    WarmUp,
    Measure,
    Done,
}

/// Limits for a single scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub warmup_iterations: u64,
    pub warmup_time: Option<Duration>,
    pub measurement_iterations: u64,
    pub measurement_time: Option<Duration>,
    /// Session-wide cut-off shared by every scenario.
    pub deadline: Option<Instant>,
}

impl Budget {
    pub fn from_config(config: &SessionConfig, deadline: Option<Instant>) -> Self {
        Self {
            warmup_iterations: config.warmup_iterations,
            warmup_time: config.warmup_time(),
            measurement_iterations: config.measurement_iterations,
            measurement_time: config.time_budget_per_scenario(),
            deadline,
        }
    }

    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationFailure {
    pub phase: Phase,
    /// 1-based index of the failing invocation within its phase.
    pub iteration: u64,
    pub message: String,
}

/// Everything a finished scenario hands to the aggregator.
#[derive(Debug, Clone)]
pub struct MeasurementRun {
    pub durations: Vec<Duration>,
    pub warmup_invocations: u64,
    /// Measurement stopped early on the time budget or the session deadline.
    pub truncated: bool,
    pub failure: Option<InvocationFailure>,
    pub sink: Sink,
}

pub struct IterationController {
    budget: Budget,
    phase: Phase,
}

impl IterationController {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn run(&mut self, workload: &Workload, fixture: &Fixture) -> MeasurementRun {
        let label = workload.label();
        let mut guard = ExecutionGuard::new(workload, fixture);

        self.enter(Phase::WarmUp, &label);
        let warmup_started = Instant::now();
        let mut warmup_invocations = 0u64;
        while warmup_invocations < self.budget.warmup_iterations {
            if exceeded(warmup_started, self.budget.warmup_time) || self.budget.deadline_passed() {
                break;
            }
            if let Err(err) = guard.invoke() {
                let failure = invocation_failure(Phase::WarmUp, warmup_invocations + 1, err);
                return self.finish(&label, guard.into_sink(), Vec::new(), warmup_invocations, false, Some(failure));
            }
            warmup_invocations += 1;
        }

        self.enter(Phase::Measure, &label);
        let target = self.budget.measurement_iterations;
        let mut durations = Vec::with_capacity(usize::try_from(target).unwrap_or(usize::MAX).min(1 << 20));
        let measure_started = Instant::now();
        let mut truncated = false;
        let mut failure = None;
        while (durations.len() as u64) < target {
            if exceeded(measure_started, self.budget.measurement_time) || self.budget.deadline_passed() {
                truncated = true;
                break;
            }
            match guard.invoke() {
                Ok(invocation) => durations.push(invocation.elapsed),
                Err(err) => {
                    failure = Some(invocation_failure(Phase::Measure, durations.len() as u64 + 1, err));
                    break;
                }
            }
        }

        self.finish(&label, guard.into_sink(), durations, warmup_invocations, truncated, failure)
    }

    fn enter(&mut self, phase: Phase, label: &str) {
        tracing::trace!(
            target: "seqbench::controller",
            scenario = label,
            from = ?self.phase,
            to = ?phase,
            "phase transition"
        );
        self.phase = phase;
    }

    fn finish(
        &mut self,
        label: &str,
        sink: Sink,
        durations: Vec<Duration>,
        warmup_invocations: u64,
        truncated: bool,
        failure: Option<InvocationFailure>,
    ) -> MeasurementRun {
        self.enter(Phase::Done, label);
        if truncated {
            tracing::warn!(
                target: "seqbench::controller",
                scenario = label,
                samples = durations.len(),
                "measurement stopped early; sample count is partial"
            );
        }
        if let Some(failure) = &failure {
            tracing::warn!(
                target: "seqbench::controller",
                scenario = label,
                phase = ?failure.phase,
                iteration = failure.iteration,
                "{}",
                failure.message
            );
        }
        MeasurementRun {
            durations,
            warmup_invocations,
            truncated,
            failure,
            sink,
        }
    }
}

fn exceeded(started: Instant, limit: Option<Duration>) -> bool {
    limit.is_some_and(|limit| started.elapsed() >= limit)
}

fn invocation_failure(phase: Phase, iteration: u64, err: HarnessError) -> InvocationFailure {
    let message = match err {
        HarnessError::ScenarioInvocation { message, .. } => message,
        other => other.to_string(),
    };
    InvocationFailure {
        phase,
        iteration,
        message,
    }
}
