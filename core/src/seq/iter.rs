use super::{ContainerKind, Deconstruct, Elem, Traverse};
use crate::fixture::{Fixture, FixtureData};
use anyhow::{Result, anyhow};
use std::fmt;
use std::sync::Arc;

/// Cursor over shared storage; every fixture read opens a fresh one.
#[derive(Debug, Clone)]
pub struct SharedIter {
    data: Arc<[Elem]>,
    idx: usize,
}

impl SharedIter {
    pub fn new(data: Arc<[Elem]>) -> Self {
        Self { data, idx: 0 }
    }
}

impl Iterator for SharedIter {
    type Item = Elem;

    fn next(&mut self) -> Option<Elem> {
        let value = self.data.get(self.idx).copied()?;
        self.idx += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().saturating_sub(self.idx);
        (remaining, Some(remaining))
    }
}

/// Single-pass pipeline of iterator adapters. Nothing runs until a terminal
/// operation drains it, and once drained it cannot be replayed.
pub struct IterPipeline(Box<dyn Iterator<Item = Elem> + Send>);

impl IterPipeline {
    pub fn new<I>(source: I) -> Self
    where
        I: Iterator<Item = Elem> + Send + 'static,
    {
        Self(Box::new(source))
    }
}

impl fmt::Debug for IterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterPipeline").field("size_hint", &self.0.size_hint()).finish()
    }
}

impl Traverse for IterPipeline {
    const KIND: ContainerKind = ContainerKind::Iterator;

    fn from_fixture(fixture: &Fixture) -> Result<Self> {
        match fixture.data() {
            FixtureData::Iterator(data) => Ok(Self::new(SharedIter::new(data.clone()))),
            _ => Err(anyhow!("iterator scenario received a {} fixture", fixture.kind())),
        }
    }

    fn map<F>(self, f: F) -> Self
    where
        F: Fn(Elem) -> Elem + Send + Sync + 'static,
    {
        Self(Box::new(self.0.map(f)))
    }

    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Elem) -> bool + Send + Sync + 'static,
    {
        Self(Box::new(self.0.filter(predicate)))
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Elem) -> B,
    {
        self.0.fold(init, f)
    }

    fn maximum(self) -> Option<Elem> {
        self.0.max()
    }

    fn head(mut self) -> Option<Elem> {
        self.0.next()
    }
}

impl Deconstruct for IterPipeline {
    fn uncons(mut self) -> Option<(Elem, Self)> {
        let head = self.0.next()?;
        Some((head, self))
    }
}
