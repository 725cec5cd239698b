use crate::seq::ContainerKind;
use thiserror::Error;

/// Errors raised by the harness itself.
///
/// Only `EmptyRegistry`, `DuplicateWorkload` and `InvalidConfig` abort a
/// session. The remaining kinds are scoped to a single fixture or cell and are
/// recorded in the report instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("workload registry is empty; register at least one scenario")]
    EmptyRegistry,

    #[error("workload {kind}/{operation} is registered more than once")]
    DuplicateWorkload { kind: ContainerKind, operation: String },

    #[error("cannot build {kind} fixture: {reason}")]
    FixtureConstruction { kind: ContainerKind, reason: String },

    #[error("scenario {label} failed: {message}")]
    ScenarioInvocation { label: String, message: String },

    #[error("aggregation needs at least {required} measurement(s), got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
