//! Scenario catalog: the traversal idioms measured on every container kind.
//!
//! Each scenario builds its pipeline from the fixture and hands back a
//! pending terminal step, so lazy kinds only describe the work until the
//! execution guard forces it. Kinds without a capability (an iterator cannot
//! be reversed or sorted) simply get no entry for the matching operation.

use crate::error::{HarnessError, Result};
use crate::fixture::{Fixture, MAX_FIXTURE_SIZE};
use crate::guard::{Deferred, Scalar};
use crate::registry::{Registry, Workload};
use crate::seq::{
    ArraySeq, Deconstruct, Elem, IterPipeline, LazySeq, Order, PersistentList, PersistentVector, Reverse, Sort,
    Traverse,
};
use anyhow::anyhow;

pub const FOLD_MAX: &str = "fold_max";
pub const REDUCE_MAX: &str = "reduce_max";
pub const MAP_FILTER_MAP_MAX: &str = "map_filter_map_max";
pub const MAP_FILTER_MAP_HEAD: &str = "map_filter_map_head";
pub const REVERSE_HEAD: &str = "reverse_head";
pub const SORT_HEAD: &str = "sort_head";
pub const PATTERN_MAX: &str = "pattern_max";

const TRANSFORM_PIPELINE: &str = "+1, keep even, x2";

/// Every workload for fixtures of `size` elements, grouped by kind.
pub fn catalog(size: usize) -> Result<Registry> {
    let n = Some(size)
        .filter(|&size| size > 0 && size <= MAX_FIXTURE_SIZE)
        .and_then(|size| Elem::try_from(size).ok())
        .ok_or_else(|| HarnessError::InvalidConfig(format!("catalog size {} is out of range", size)))?;

    let mut registry = Registry::new();

    register_traversals::<ArraySeq>(&mut registry, n)?;
    register_reorders::<ArraySeq>(&mut registry, n)?;
    register_pattern::<ArraySeq>(&mut registry, n)?;

    register_traversals::<PersistentList>(&mut registry, n)?;
    register_reorders::<PersistentList>(&mut registry, n)?;
    register_pattern::<PersistentList>(&mut registry, n)?;

    register_traversals::<PersistentVector>(&mut registry, n)?;
    register_reorders::<PersistentVector>(&mut registry, n)?;
    register_pattern::<PersistentVector>(&mut registry, n)?;

    register_traversals::<LazySeq<Elem>>(&mut registry, n)?;
    register_reorders::<LazySeq<Elem>>(&mut registry, n)?;
    register_pattern::<LazySeq<Elem>>(&mut registry, n)?;

    register_traversals::<IterPipeline>(&mut registry, n)?;
    register_pattern::<IterPipeline>(&mut registry, n)?;

    Ok(registry)
}

fn register_traversals<S: Traverse + 'static>(registry: &mut Registry, n: Elem) -> Result<()> {
    registry.register(
        Workload::new(S::KIND, FOLD_MAX, Order::Ascending, fold_max::<S>)
            .with_pipeline("fold with running max")
            .with_expected(n),
    )?;
    registry.register(
        Workload::new(S::KIND, REDUCE_MAX, Order::Ascending, reduce_max::<S>)
            .with_pipeline("max")
            .with_expected(n),
    )?;
    registry.register(
        Workload::new(S::KIND, MAP_FILTER_MAP_MAX, Order::Ascending, map_filter_map_max::<S>)
            .with_pipeline(format!("{}, max", TRANSFORM_PIPELINE))
            .with_expected(transformed_max(n)),
    )?;
    registry.register(
        Workload::new(S::KIND, MAP_FILTER_MAP_HEAD, Order::Ascending, map_filter_map_head::<S>)
            .with_pipeline(format!("{}, first", TRANSFORM_PIPELINE))
            .with_expected(4),
    )
}

fn register_reorders<S: Reverse + Sort + 'static>(registry: &mut Registry, n: Elem) -> Result<()> {
    registry.register(
        Workload::new(S::KIND, REVERSE_HEAD, Order::Ascending, reverse_head::<S>)
            .with_pipeline("reverse, first")
            .with_expected(n),
    )?;
    registry.register(
        Workload::new(S::KIND, SORT_HEAD, Order::Descending, sort_head::<S>)
            .with_pipeline("sort, first")
            .with_expected(1),
    )
}

fn register_pattern<S: Deconstruct + 'static>(registry: &mut Registry, n: Elem) -> Result<()> {
    registry.register(
        Workload::new(S::KIND, PATTERN_MAX, Order::Ascending, pattern_max::<S>)
            .with_pipeline("head/tail match loop, max")
            .with_expected(n),
    )
}

/// Max of `(x + 1) * 2` over the even `x + 1` for `x` in `1..=n`.
pub fn transformed_max(n: Elem) -> Scalar {
    let top = if (n + 1) % 2 == 0 { n + 1 } else { n };
    top * 2
}

fn empty<S: Traverse>(operation: &str) -> anyhow::Error {
    anyhow!("{} on an empty {} has no result", operation, S::KIND)
}

fn transformed<S: Traverse>(seq: S) -> S {
    seq.map(|x| x + 1).filter(|x| x % 2 == 0).map(|x| x * 2)
}

pub fn fold_max<S: Traverse + 'static>(fixture: &Fixture) -> anyhow::Result<Deferred> {
    let seq = S::from_fixture(fixture)?;
    Ok(Deferred::pending(move || {
        seq.fold(None, |best: Option<Elem>, x| Some(best.map_or(x, |b| b.max(x))))
            .ok_or_else(|| empty::<S>(FOLD_MAX))
    }))
}

pub fn reduce_max<S: Traverse + 'static>(fixture: &Fixture) -> anyhow::Result<Deferred> {
    let seq = S::from_fixture(fixture)?;
    Ok(Deferred::pending(move || seq.maximum().ok_or_else(|| empty::<S>(REDUCE_MAX))))
}

pub fn map_filter_map_max<S: Traverse + 'static>(fixture: &Fixture) -> anyhow::Result<Deferred> {
    let pipeline = transformed(S::from_fixture(fixture)?);
    Ok(Deferred::pending(move || {
        pipeline.maximum().ok_or_else(|| empty::<S>(MAP_FILTER_MAP_MAX))
    }))
}

pub fn map_filter_map_head<S: Traverse + 'static>(fixture: &Fixture) -> anyhow::Result<Deferred> {
    let pipeline = transformed(S::from_fixture(fixture)?);
    Ok(Deferred::pending(move || {
        pipeline.head().ok_or_else(|| empty::<S>(MAP_FILTER_MAP_HEAD))
    }))
}

pub fn reverse_head<S: Reverse + 'static>(fixture: &Fixture) -> anyhow::Result<Deferred> {
    let seq = S::from_fixture(fixture)?;
    Ok(Deferred::pending(move || {
        seq.reverse().head().ok_or_else(|| empty::<S>(REVERSE_HEAD))
    }))
}

pub fn sort_head<S: Sort + 'static>(fixture: &Fixture) -> anyhow::Result<Deferred> {
    let seq = S::from_fixture(fixture)?;
    Ok(Deferred::pending(move || seq.sort().head().ok_or_else(|| empty::<S>(SORT_HEAD))))
}

/// Walks the sequence by repeated head/tail matching. The loop is iterative
/// so deep sequences cannot exhaust the stack.
pub fn pattern_max<S: Deconstruct + 'static>(fixture: &Fixture) -> anyhow::Result<Deferred> {
    let seq = S::from_fixture(fixture)?;
    Ok(Deferred::pending(move || {
        let Some((first, mut rest)) = seq.uncons() else {
            return Err(empty::<S>(PATTERN_MAX));
        };
        let mut best = first;
        while let Some((head, tail)) = rest.uncons() {
            best = best.max(head);
            rest = tail;
        }
        Ok(best)
    }))
}
