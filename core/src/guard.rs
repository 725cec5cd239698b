//! Execution guard: the only place a scenario is invoked during a session.
//!
//! The guard times the scenario body together with the forcing of whatever it
//! deferred, pushes the resulting scalar through `black_box` into a [`Sink`],
//! and converts errors and panics into scenario failures. A deferred value
//! never leaves the guard unforced.

use crate::error::{HarnessError, Result};
use crate::fixture::Fixture;
use crate::registry::Workload;
use crate::seq::Elem;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

pub type Scalar = Elem;

type Thunk = Box<dyn FnOnce() -> anyhow::Result<Scalar>>;

/// Result of a scenario body: either the final scalar, or a suspended
/// computation that still has to run to produce it.
pub enum Deferred {
    Resolved(Scalar),
    Pending(Thunk),
}

impl Deferred {
    pub fn pending<F>(compute: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<Scalar> + 'static,
    {
        Deferred::Pending(Box::new(compute))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Deferred::Pending(_))
    }

    pub fn force(self) -> anyhow::Result<Scalar> {
        match self {
            Deferred::Resolved(value) => Ok(value),
            Deferred::Pending(compute) => compute(),
        }
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Resolved(value) => f.debug_tuple("Resolved").field(value).finish(),
            Deferred::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Observable destination for every produced scalar.
///
/// The checksum and counters end up in the report, so the optimizer cannot
/// prove the values unused. The first value is kept to detect scenarios whose
/// result changes between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sink {
    invocations: u64,
    checksum: u64,
    first: Option<Scalar>,
    last: Option<Scalar>,
}

impl Sink {
    /// Records `value`. Returns `false` when it differs from the first value
    /// this sink saw.
    pub fn consume(&mut self, value: Scalar) -> bool {
        let value = black_box(value);
        self.invocations += 1;
        self.checksum = self.checksum.rotate_left(5) ^ (value as u64);
        self.last = Some(value);
        match self.first {
            None => {
                self.first = Some(value);
                true
            }
            Some(first) => first == value,
        }
    }

    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    /// The value every successful invocation agreed on.
    pub fn observed(&self) -> Option<Scalar> {
        self.first
    }

    pub fn last(&self) -> Option<Scalar> {
        self.last
    }
}

/// A successful invocation. Its value has already reached the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub value: Scalar,
    pub elapsed: Duration,
}

/// Guards repeated invocations of one workload against one fixture. A fresh
/// guard (and sink) is created per scenario so no state carries over.
pub struct ExecutionGuard<'a> {
    workload: &'a Workload,
    fixture: &'a Fixture,
    sink: Sink,
}

impl<'a> ExecutionGuard<'a> {
    pub fn new(workload: &'a Workload, fixture: &'a Fixture) -> Self {
        Self {
            workload,
            fixture,
            sink: Sink::default(),
        }
    }

    /// Runs the scenario once and forces its result inside the timed region.
    pub fn invoke(&mut self) -> Result<Invocation> {
        let workload = self.workload;
        let fixture = black_box(self.fixture);

        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| workload.prepare(fixture).and_then(Deferred::force)));
        let elapsed = started.elapsed();

        let value = match outcome {
            Ok(Ok(value)) => black_box(value),
            Ok(Err(err)) => return Err(self.failure(format!("{:#}", err))),
            Err(payload) => return Err(self.failure(format!("panicked: {}", panic_message(payload.as_ref())))),
        };

        if let Some(expected) = workload.expected() {
            if value != expected {
                return Err(self.failure(format!("expected {} but observed {}", expected, value)));
            }
        }

        if !self.sink.consume(value) {
            let first = self.sink.observed().unwrap_or(value);
            return Err(self.failure(format!(
                "non-deterministic result: observed {} after {}",
                value, first
            )));
        }

        Ok(Invocation { value, elapsed })
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn into_sink(self) -> Sink {
        self.sink
    }

    fn failure(&self, message: String) -> HarnessError {
        HarnessError::ScenarioInvocation {
            label: self.workload.label(),
            message,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
