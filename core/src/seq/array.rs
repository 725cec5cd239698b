use super::{ContainerKind, Deconstruct, Elem, Reverse, Sort, Traverse};
use crate::fixture::{Fixture, FixtureData};
use anyhow::{Result, anyhow};
use std::sync::Arc;

/// Contiguous array view: shared storage plus a start offset so slice
/// patterns can peel the head without copying the rest.
#[derive(Debug, Clone)]
pub struct ArraySeq {
    data: Arc<[Elem]>,
    start: usize,
}

impl ArraySeq {
    pub fn new(data: Arc<[Elem]>) -> Self {
        Self { data, start: 0 }
    }

    pub fn as_slice(&self) -> &[Elem] {
        self.data.get(self.start..).unwrap_or(&[])
    }

    fn collect_from<I: Iterator<Item = Elem>>(iter: I) -> Self {
        Self::new(iter.collect())
    }
}

impl Traverse for ArraySeq {
    const KIND: ContainerKind = ContainerKind::Array;

    fn from_fixture(fixture: &Fixture) -> Result<Self> {
        match fixture.data() {
            FixtureData::Array(data) => Ok(Self::new(data.clone())),
            _ => Err(anyhow!("array scenario received a {} fixture", fixture.kind())),
        }
    }

    fn map<F>(self, f: F) -> Self
    where
        F: Fn(Elem) -> Elem + Send + Sync + 'static,
    {
        Self::collect_from(self.as_slice().iter().map(|&x| f(x)))
    }

    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Elem) -> bool + Send + Sync + 'static,
    {
        Self::collect_from(self.as_slice().iter().copied().filter(|x| predicate(x)))
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Elem) -> B,
    {
        self.as_slice().iter().copied().fold(init, f)
    }

    fn maximum(self) -> Option<Elem> {
        self.as_slice().iter().copied().max()
    }

    fn head(self) -> Option<Elem> {
        self.as_slice().first().copied()
    }
}

impl Reverse for ArraySeq {
    fn reverse(self) -> Self {
        Self::collect_from(self.as_slice().iter().rev().copied())
    }
}

impl Sort for ArraySeq {
    fn sort(self) -> Self {
        let mut sorted = self.as_slice().to_vec();
        sorted.sort();
        Self::new(sorted.into())
    }
}

impl Deconstruct for ArraySeq {
    fn uncons(self) -> Option<(Elem, Self)> {
        let [head, ..] = *self.as_slice() else {
            return None;
        };
        Some((
            head,
            Self {
                data: self.data,
                start: self.start + 1,
            },
        ))
    }
}
