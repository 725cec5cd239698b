use super::{ContainerKind, Deconstruct, Elem, Reverse, Sort, Traverse};
use crate::fixture::{Fixture, FixtureData};
use anyhow::{Result, anyhow};
use rpds::ListSync;

/// Persistent singly-linked list. Transformations go through a buffer and
/// are rebuilt back to front, the way list builders work.
#[derive(Debug, Clone)]
pub struct PersistentList(ListSync<Elem>);

impl PersistentList {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Elem>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut list = ListSync::new_sync();
        for value in values.into_iter().rev() {
            list.push_front_mut(value);
        }
        Self(list)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn buffered<I: Iterator<Item = Elem>>(iter: I) -> Self {
        let buffer: Vec<Elem> = iter.collect();
        Self::from_values(buffer)
    }
}

impl Traverse for PersistentList {
    const KIND: ContainerKind = ContainerKind::List;

    fn from_fixture(fixture: &Fixture) -> Result<Self> {
        match fixture.data() {
            FixtureData::List(list) => Ok(list.clone()),
            _ => Err(anyhow!("list scenario received a {} fixture", fixture.kind())),
        }
    }

    fn map<F>(self, f: F) -> Self
    where
        F: Fn(Elem) -> Elem + Send + Sync + 'static,
    {
        Self::buffered(self.0.iter().map(|&x| f(x)))
    }

    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Elem) -> bool + Send + Sync + 'static,
    {
        Self::buffered(self.0.iter().copied().filter(|x| predicate(x)))
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Elem) -> B,
    {
        self.0.iter().copied().fold(init, f)
    }

    fn maximum(self) -> Option<Elem> {
        self.0.iter().copied().max()
    }

    fn head(self) -> Option<Elem> {
        self.0.first().copied()
    }
}

impl Reverse for PersistentList {
    fn reverse(self) -> Self {
        Self(self.0.reverse())
    }
}

impl Sort for PersistentList {
    fn sort(self) -> Self {
        let mut buffer: Vec<Elem> = self.0.iter().copied().collect();
        buffer.sort();
        Self::from_values(buffer)
    }
}

impl Deconstruct for PersistentList {
    fn uncons(self) -> Option<(Elem, Self)> {
        let head = *self.0.first()?;
        let tail = self.0.drop_first()?;
        Some((head, Self(tail)))
    }
}
