pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod fixture;
pub mod guard;
pub mod registry;
pub mod report;
pub mod seq;
pub mod session;
pub mod stats;

// Shared scenario catalog for the CLI runner and the benches
pub mod perf;

pub use config::SessionConfig;
pub use error::{HarnessError, Result};
pub use fixture::{Fixture, FixtureBuilder};
pub use guard::{Deferred, ExecutionGuard, Scalar};
pub use registry::{Registry, Workload};
pub use report::{CellFailure, Report, ReportEntry};
pub use seq::{ContainerKind, Order};
pub use session::Session;
pub use stats::{ResultCell, aggregate};

#[cfg(test)]
mod clock_test;
#[cfg(test)]
mod config_test;
#[cfg(test)]
mod fixture_test;
#[cfg(test)]
mod registry_test;
