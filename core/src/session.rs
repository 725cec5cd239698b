//! Session driver: runs every registered workload once through the
//! iteration controller and collects the report.

use crate::clock;
use crate::config::SessionConfig;
use crate::controller::{Budget, IterationController, MeasurementRun};
use crate::error::{HarnessError, Result};
use crate::fixture::FixtureSet;
use crate::registry::{Registry, Workload};
use crate::report::{CellFailure, Report, ReportEntry};
use crate::stats;
use std::time::{Duration, Instant};

/// Clock steps coarser than this make sub-microsecond scenarios unmeasurable.
const RESOLUTION_WARN_THRESHOLD: Duration = Duration::from_micros(1);

pub struct Session {
    config: SessionConfig,
    registry: Registry,
}

impl Session {
    pub fn new(config: SessionConfig, registry: Registry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs the session. Only an empty registry or an invalid config fails
    /// the whole run; everything else is recorded per cell.
    pub fn run(&self) -> Result<Report> {
        self.registry.ensure_not_empty()?;
        self.config.validate()?;

        let generated_at = chrono::Utc::now().to_rfc3339();
        let session_started = Instant::now();
        let deadline = self.config.session_deadline().map(|limit| session_started + limit);

        let resolution = clock::resolution();
        match resolution {
            Some(step) if step > RESOLUTION_WARN_THRESHOLD => tracing::warn!(
                target: "seqbench::session",
                resolution_ns = step.as_nanos() as u64,
                "monotonic clock is coarser than 1us; short scenarios will read as zero"
            ),
            Some(step) => tracing::debug!(
                target: "seqbench::session",
                resolution_ns = step.as_nanos() as u64,
                "clock resolution probed"
            ),
            None => tracing::warn!(target: "seqbench::session", "monotonic clock did not advance while probing"),
        }

        tracing::info!(
            target: "seqbench::session",
            workloads = self.registry.len(),
            fixture_size = self.config.fixture_size,
            warmup = self.config.warmup_iterations,
            iterations = self.config.measurement_iterations,
            "session starting"
        );

        let fixtures = FixtureSet::build(
            &self.registry.fixture_requirements(),
            self.config.fixture_size,
            self.config.parallel_fixtures,
        );

        let budget = Budget::from_config(&self.config, deadline);
        let mut entries = Vec::with_capacity(self.registry.len());
        for workload in &self.registry {
            if budget.deadline_passed() {
                tracing::warn!(
                    target: "seqbench::session",
                    scenario = %workload.label(),
                    "skipped after session deadline"
                );
                entries.push(failed_entry(workload, CellFailure::SessionDeadlineExceeded));
                continue;
            }
            let fixture = match fixtures.get(workload.kind(), workload.order()) {
                Some(Ok(fixture)) => fixture,
                Some(Err(err)) => {
                    entries.push(failed_entry(workload, fixture_failure(err)));
                    continue;
                }
                None => {
                    let reason = format!("no {} fixture was built", workload.order());
                    entries.push(failed_entry(workload, CellFailure::FixtureConstruction { reason }));
                    continue;
                }
            };

            let mut controller = IterationController::new(budget);
            let run = controller.run(workload, fixture);
            let entry = measured_entry(workload, run);
            tracing::debug!(
                target: "seqbench::session",
                scenario = %entry.label(),
                status = entry.status().label(),
                "scenario finished"
            );
            entries.push(entry);
        }

        let report = Report::new(
            generated_at,
            self.config.clone(),
            resolution.map(|step| step.as_nanos() as u64),
            entries,
        );
        tracing::info!(
            target: "seqbench::session",
            entries = report.len(),
            failures = report.failures().count(),
            elapsed_ms = session_started.elapsed().as_millis() as u64,
            "session finished"
        );
        Ok(report)
    }
}

fn base_entry(workload: &Workload) -> ReportEntry {
    ReportEntry {
        kind: workload.kind(),
        operation: workload.operation().to_string(),
        order: workload.order(),
        pipeline: workload.pipeline().map(str::to_string),
        cell: None,
        failure: None,
        observed: None,
        checksum: 0,
        invocations: 0,
    }
}

fn failed_entry(workload: &Workload, failure: CellFailure) -> ReportEntry {
    ReportEntry {
        failure: Some(failure),
        ..base_entry(workload)
    }
}

fn fixture_failure(err: &HarnessError) -> CellFailure {
    let reason = match err {
        HarnessError::FixtureConstruction { reason, .. } => reason.clone(),
        other => other.to_string(),
    };
    CellFailure::FixtureConstruction { reason }
}

fn measured_entry(workload: &Workload, run: MeasurementRun) -> ReportEntry {
    let MeasurementRun {
        durations,
        truncated,
        failure,
        sink,
        ..
    } = run;

    let mut entry = base_entry(workload);
    entry.observed = sink.observed();
    entry.checksum = sink.checksum();
    entry.invocations = sink.invocations();

    let invocation_failure = failure.map(|failure| CellFailure::ScenarioInvocation {
        phase: failure.phase,
        iteration: failure.iteration,
        message: failure.message,
    });

    match stats::aggregate(&durations) {
        Ok(cell) => {
            entry.cell = Some(cell.with_truncated(truncated));
            entry.failure = invocation_failure;
        }
        Err(HarnessError::InsufficientSamples { required, actual }) => {
            entry.failure = Some(match invocation_failure {
                Some(failure) => failure,
                None if truncated => CellFailure::SessionDeadlineExceeded,
                None => CellFailure::InsufficientSamples { required, actual },
            });
        }
        Err(other) => {
            entry.failure = Some(CellFailure::InsufficientSamples {
                required: stats::MIN_SAMPLES,
                actual: durations.len(),
            });
            tracing::error!(target: "seqbench::session", scenario = %workload.label(), "{}", other);
        }
    }
    entry
}
