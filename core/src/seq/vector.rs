use super::{ContainerKind, Deconstruct, Elem, Reverse, Sort, Traverse};
use crate::fixture::{Fixture, FixtureData};
use anyhow::{Result, anyhow};
use rpds::VectorSync;

/// Persistent balanced sequence (bitmapped vector trie). `start` lets the
/// head/tail deconstruction advance in place of a structural drop.
#[derive(Debug, Clone)]
pub struct PersistentVector {
    data: VectorSync<Elem>,
    start: usize,
}

impl PersistentVector {
    pub fn from_values<I: IntoIterator<Item = Elem>>(values: I) -> Self {
        let mut data = VectorSync::new_sync();
        for value in values {
            data.push_back_mut(value);
        }
        Self { data, start: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len().saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn values(&self) -> impl DoubleEndedIterator<Item = Elem> + '_ {
        (self.start..self.data.len()).filter_map(|index| self.data.get(index).copied())
    }
}

impl Traverse for PersistentVector {
    const KIND: ContainerKind = ContainerKind::Vector;

    fn from_fixture(fixture: &Fixture) -> Result<Self> {
        match fixture.data() {
            FixtureData::Vector(vector) => Ok(vector.clone()),
            _ => Err(anyhow!("vector scenario received a {} fixture", fixture.kind())),
        }
    }

    fn map<F>(self, f: F) -> Self
    where
        F: Fn(Elem) -> Elem + Send + Sync + 'static,
    {
        Self::from_values(self.data.iter().skip(self.start).map(|&x| f(x)))
    }

    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Elem) -> bool + Send + Sync + 'static,
    {
        Self::from_values(self.data.iter().skip(self.start).copied().filter(|x| predicate(x)))
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Elem) -> B,
    {
        self.data.iter().skip(self.start).copied().fold(init, f)
    }

    fn maximum(self) -> Option<Elem> {
        self.data.iter().skip(self.start).copied().max()
    }

    fn head(self) -> Option<Elem> {
        self.data.get(self.start).copied()
    }
}

impl Reverse for PersistentVector {
    fn reverse(self) -> Self {
        Self::from_values(self.values().rev())
    }
}

impl Sort for PersistentVector {
    fn sort(self) -> Self {
        let mut buffer: Vec<Elem> = self.values().collect();
        buffer.sort();
        Self::from_values(buffer)
    }
}

impl Deconstruct for PersistentVector {
    fn uncons(self) -> Option<(Elem, Self)> {
        let head = *self.data.get(self.start)?;
        Some((
            head,
            Self {
                data: self.data,
                start: self.start + 1,
            },
        ))
    }
}
