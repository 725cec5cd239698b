//! Fixture construction.
//!
//! Fixtures are built once per session, outside any timed region, and are
//! read-only afterwards. Every payload is `Send + Sync`, so a fixture can be
//! shared by reference across threads; nothing in a fixture is mutated after
//! `FixtureBuilder::build` returns (lazy fixtures are fully forced first).

use crate::error::{HarnessError, Result};
use crate::seq::{ContainerKind, Elem, LazySeq, Order, PersistentList, PersistentVector, Traverse};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Upper bound on elements per fixture.
pub const MAX_FIXTURE_SIZE: usize = 50_000_000;

pub enum FixtureData {
    Array(Arc<[Elem]>),
    List(PersistentList),
    Vector(PersistentVector),
    Lazy(LazySeq<Elem>),
    Iterator(Arc<[Elem]>),
}

pub struct Fixture {
    kind: ContainerKind,
    order: Order,
    size: usize,
    data: FixtureData,
}

impl Fixture {
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    /// Snapshot of the elements in fixture order.
    pub fn elements(&self) -> Vec<Elem> {
        let push = |mut out: Vec<Elem>, x: Elem| {
            out.push(x);
            out
        };
        let out = Vec::with_capacity(self.size);
        match &self.data {
            FixtureData::Array(data) | FixtureData::Iterator(data) => data.to_vec(),
            FixtureData::List(list) => list.clone().fold(out, push),
            FixtureData::Vector(vector) => vector.clone().fold(out, push),
            FixtureData::Lazy(seq) => seq.clone().fold(out, push),
        }
    }
}

impl PartialEq for Fixture {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.order == other.order
            && self.size == other.size
            && self.elements() == other.elements()
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("kind", &self.kind)
            .field("order", &self.order)
            .field("size", &self.size)
            .finish()
    }
}

pub struct FixtureBuilder;

impl FixtureBuilder {
    /// Builds the fixture for `(kind, size, order)`. Deterministic: two
    /// builds with the same arguments compare equal element for element.
    pub fn build(kind: ContainerKind, size: usize, order: Order) -> Result<Fixture> {
        if size == 0 {
            return Err(HarnessError::FixtureConstruction {
                kind,
                reason: "size must be positive".to_string(),
            });
        }
        if size > MAX_FIXTURE_SIZE {
            return Err(HarnessError::FixtureConstruction {
                kind,
                reason: format!("size {} exceeds the limit of {}", size, MAX_FIXTURE_SIZE),
            });
        }
        let len = Elem::try_from(size).map_err(|e| HarnessError::FixtureConstruction {
            kind,
            reason: format!("size {} does not fit the element type: {}", size, e),
        })?;

        let started = Instant::now();
        let values = order.values(len);
        let data = match kind {
            ContainerKind::Array => FixtureData::Array(values.into()),
            ContainerKind::List => FixtureData::List(PersistentList::from_values(values)),
            ContainerKind::Vector => FixtureData::Vector(PersistentVector::from_values(values)),
            ContainerKind::Lazy => {
                let seq = LazySeq::from_source(values.into_iter());
                let forced = seq.force_all();
                if forced != size {
                    return Err(HarnessError::FixtureConstruction {
                        kind,
                        reason: format!("lazy fixture forced {} of {} elements", forced, size),
                    });
                }
                FixtureData::Lazy(seq)
            }
            ContainerKind::Iterator => FixtureData::Iterator(values.into()),
        };
        tracing::debug!(
            target: "seqbench::fixture",
            %kind,
            %order,
            size,
            elapsed_us = started.elapsed().as_micros() as u64,
            "fixture built"
        );
        Ok(Fixture {
            kind,
            order,
            size,
            data,
        })
    }
}

type Built = ((ContainerKind, Order), Result<Fixture>);

/// All fixtures a session needs, keyed by `(kind, order)`. A failed build is
/// kept so every workload depending on it can report the reason.
#[derive(Default)]
pub struct FixtureSet {
    fixtures: FxHashMap<(ContainerKind, Order), Result<Fixture>>,
}

impl FixtureSet {
    pub fn build(requirements: &[(ContainerKind, Order)], size: usize, parallel: bool) -> Self {
        let built = if parallel && requirements.len() > 1 {
            Self::build_parallel(requirements, size).unwrap_or_else(|| Self::build_sequential(requirements, size))
        } else {
            Self::build_sequential(requirements, size)
        };
        Self {
            fixtures: built.into_iter().collect(),
        }
    }

    pub fn get(&self, kind: ContainerKind, order: Order) -> Option<&Result<Fixture>> {
        self.fixtures.get(&(kind, order))
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    fn build_sequential(requirements: &[(ContainerKind, Order)], size: usize) -> Vec<Built> {
        requirements
            .iter()
            .map(|&(kind, order)| ((kind, order), FixtureBuilder::build(kind, size, order)))
            .collect()
    }

    /// Builds each fixture on its own scoped thread. Returns `None` when the
    /// scope itself fails so the caller can fall back to a sequential build.
    fn build_parallel(requirements: &[(ContainerKind, Order)], size: usize) -> Option<Vec<Built>> {
        crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = requirements
                .iter()
                .map(|&(kind, order)| {
                    let handle = scope.spawn(move |_| FixtureBuilder::build(kind, size, order));
                    (kind, order, handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(kind, order, handle)| {
                    let built = handle.join().unwrap_or_else(|_| {
                        Err(HarnessError::FixtureConstruction {
                            kind,
                            reason: "builder thread panicked".to_string(),
                        })
                    });
                    ((kind, order), built)
                })
                .collect::<Vec<_>>()
        })
        .ok()
    }
}
