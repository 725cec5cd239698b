use crate::error::{HarnessError, Result};
use crate::fixture::Fixture;
use crate::guard::{Deferred, Scalar};
use crate::seq::{ContainerKind, Order};
use std::fmt;
use std::sync::Arc;

/// A scenario turns a fixture into a scalar, possibly deferring the work
/// until the execution guard forces it.
pub type ScenarioFn = Arc<dyn Fn(&Fixture) -> anyhow::Result<Deferred> + Send + Sync>;

/// One registered `(container kind, operation)` pair and the scenario that
/// measures it.
#[derive(Clone)]
pub struct Workload {
    kind: ContainerKind,
    operation: String,
    order: Order,
    pipeline: Option<String>,
    expected: Option<Scalar>,
    scenario: ScenarioFn,
}

impl Workload {
    pub fn new<F>(kind: ContainerKind, operation: impl Into<String>, order: Order, scenario: F) -> Self
    where
        F: Fn(&Fixture) -> anyhow::Result<Deferred> + Send + Sync + 'static,
    {
        Self {
            kind,
            operation: operation.into(),
            order,
            pipeline: None,
            expected: None,
            scenario: Arc::new(scenario),
        }
    }

    /// Human readable description of the transformation, e.g. `+1, even, x2, max`.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// Every invocation must produce this value or it counts as failed.
    #[must_use]
    pub fn with_expected(mut self, expected: Scalar) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn pipeline(&self) -> Option<&str> {
        self.pipeline.as_deref()
    }

    pub fn expected(&self) -> Option<Scalar> {
        self.expected
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.kind, self.operation)
    }

    /// Runs the scenario body; a pending result is returned unforced.
    pub fn prepare(&self, fixture: &Fixture) -> anyhow::Result<Deferred> {
        (self.scenario)(fixture)
    }

    /// Direct, unguarded evaluation.
    pub fn evaluate(&self, fixture: &Fixture) -> anyhow::Result<Scalar> {
        self.prepare(fixture)?.force()
    }
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload")
            .field("kind", &self.kind)
            .field("operation", &self.operation)
            .field("order", &self.order)
            .field("pipeline", &self.pipeline)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Ordered set of workloads for one session. Built up front and handed to
/// the session by value; there is no global registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    workloads: Vec<Workload>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a workload. `(kind, operation)` pairs must be unique.
    pub fn register(&mut self, workload: Workload) -> Result<()> {
        if self.get(workload.kind, &workload.operation).is_some() {
            return Err(HarnessError::DuplicateWorkload {
                kind: workload.kind,
                operation: workload.operation,
            });
        }
        self.workloads.push(workload);
        Ok(())
    }

    pub fn get(&self, kind: ContainerKind, operation: &str) -> Option<&Workload> {
        self.workloads
            .iter()
            .find(|w| w.kind == kind && w.operation == operation)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workload> {
        self.workloads.iter()
    }

    pub fn len(&self) -> usize {
        self.workloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
    }

    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.workloads.is_empty() {
            Err(HarnessError::EmptyRegistry)
        } else {
            Ok(())
        }
    }

    /// Keeps only the workloads matching `keep`, preserving order.
    #[must_use]
    pub fn retain<P>(mut self, keep: P) -> Self
    where
        P: FnMut(&Workload) -> bool,
    {
        self.workloads.retain(keep);
        self
    }

    /// Distinct `(kind, order)` fixtures the workloads need, in first-use order.
    pub fn fixture_requirements(&self) -> Vec<(ContainerKind, Order)> {
        let mut required = Vec::new();
        for workload in &self.workloads {
            let key = (workload.kind, workload.order);
            if !required.contains(&key) {
                required.push(key);
            }
        }
        required
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Workload;
    type IntoIter = std::slice::Iter<'a, Workload>;

    fn into_iter(self) -> Self::IntoIter {
        self.workloads.iter()
    }
}
