//! Report surface: a read-only view over every cell of a finished session.
//!
//! There is exactly one entry per registered workload, in registry order. A
//! failed cell carries a `CellFailure` and is never confused with a cell that
//! merely measured fast.

use crate::config::SessionConfig;
use crate::controller::Phase;
use crate::guard::Scalar;
use crate::seq::{ContainerKind, Order};
use crate::stats::ResultCell;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a cell has no statistics, or only partial ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellFailure {
    FixtureConstruction {
        reason: String,
    },
    ScenarioInvocation {
        phase: Phase,
        iteration: u64,
        message: String,
    },
    InsufficientSamples {
        required: usize,
        actual: usize,
    },
    /// The session deadline passed before the scenario could start.
    SessionDeadlineExceeded,
}

impl fmt::Display for CellFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellFailure::FixtureConstruction { reason } => write!(f, "fixture construction failed: {}", reason),
            CellFailure::ScenarioInvocation {
                phase,
                iteration,
                message,
            } => write!(f, "scenario failed at {:?} iteration {}: {}", phase, iteration, message),
            CellFailure::InsufficientSamples { required, actual } => {
                write!(f, "no data: {} of {} required samples", actual, required)
            }
            CellFailure::SessionDeadlineExceeded => f.write_str("skipped: session deadline exceeded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Ok,
    /// Statistics are present but the scenario failed or was cut short.
    Partial,
    Failed,
}

impl EntryStatus {
    pub fn label(self) -> &'static str {
        match self {
            EntryStatus::Ok => "ok",
            EntryStatus::Partial => "partial",
            EntryStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub kind: ContainerKind,
    pub operation: String,
    pub order: Order,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
    pub cell: Option<ResultCell>,
    pub failure: Option<CellFailure>,
    /// Scalar every guarded invocation produced.
    pub observed: Option<Scalar>,
    pub checksum: u64,
    pub invocations: u64,
}

impl ReportEntry {
    pub fn is_success(&self) -> bool {
        self.cell.is_some() && self.failure.is_none()
    }

    pub fn status(&self) -> EntryStatus {
        match (&self.cell, &self.failure) {
            (Some(cell), None) if !cell.truncated => EntryStatus::Ok,
            (Some(_), _) => EntryStatus::Partial,
            (None, _) => EntryStatus::Failed,
        }
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.kind, self.operation)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// RFC 3339 timestamp of session start.
    pub generated_at: String,
    pub config: SessionConfig,
    pub clock_resolution_ns: Option<u64>,
    entries: Vec<ReportEntry>,
    #[serde(skip)]
    index: FxHashMap<(ContainerKind, String), usize>,
}

impl Report {
    pub fn new(
        generated_at: String,
        config: SessionConfig,
        clock_resolution_ns: Option<u64>,
        entries: Vec<ReportEntry>,
    ) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| ((entry.kind, entry.operation.clone()), pos))
            .collect();
        Self {
            generated_at,
            config,
            clock_resolution_ns,
            entries,
            index,
        }
    }

    pub fn get(&self, kind: ContainerKind, operation: &str) -> Option<&ReportEntry> {
        match self.index.get(&(kind, operation.to_string())) {
            Some(&pos) => self.entries.get(pos),
            // Deserialized reports carry no index.
            None => self
                .entries
                .iter()
                .find(|entry| entry.kind == kind && entry.operation == operation),
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|entry| entry.failure.is_some())
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(ReportEntry::is_success)
    }
}
