//! Shared benchmarking scaffolding used by the CLI session runner and the
//! Criterion benches.
//!
//! Centralizing the workloads here keeps both tools measuring the same
//! pipelines over the same fixtures, so their numbers stay comparable.

pub mod scenarios;

#[cfg(test)]
mod scenarios_test;
