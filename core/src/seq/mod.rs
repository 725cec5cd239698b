//! Container kinds under measurement and the capabilities scenarios rely on.
//!
//! Each capability is its own trait so a kind that cannot support one (a
//! single-pass iterator cannot be reversed in place, for instance) simply does
//! not implement it, and the catalog leaves the matching scenarios out.

mod array;
mod iter;
mod lazy;
mod list;
mod vector;

#[cfg(test)]
mod seq_test;

pub use array::ArraySeq;
pub use iter::{IterPipeline, SharedIter};
pub use lazy::LazySeq;
pub use list::PersistentList;
pub use vector::PersistentVector;

use crate::fixture::Fixture;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type stored in every fixture.
pub type Elem = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Contiguous shared slice.
    Array,
    /// Persistent singly-linked list.
    List,
    /// Persistent balanced sequence.
    Vector,
    /// Memoizing lazy cons sequence.
    Lazy,
    /// Single-pass iterator over shared storage.
    Iterator,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 5] = [
        ContainerKind::Array,
        ContainerKind::List,
        ContainerKind::Vector,
        ContainerKind::Lazy,
        ContainerKind::Iterator,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContainerKind::Array => "array",
            ContainerKind::List => "list",
            ContainerKind::Vector => "vector",
            ContainerKind::Lazy => "lazy",
            ContainerKind::Iterator => "iterator",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Starting order of fixture elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// `1..=n`
    Ascending,
    /// `n..=1`
    Descending,
}

impl Order {
    pub fn label(self) -> &'static str {
        match self {
            Order::Ascending => "ascending",
            Order::Descending => "descending",
        }
    }

    pub fn values(self, len: Elem) -> Vec<Elem> {
        match self {
            Order::Ascending => (1..=len).collect(),
            Order::Descending => (1..=len).rev().collect(),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Core traversal capability: every kind under test supports it.
///
/// Operations consume `self`; handles are cheap to obtain from a fixture
/// (a pointer clone, or a fresh cursor for iterators), so consuming them never
/// touches the fixture itself.
pub trait Traverse: Sized {
    const KIND: ContainerKind;

    /// Obtain a working handle over the fixture's elements.
    fn from_fixture(fixture: &Fixture) -> Result<Self>;

    fn map<F>(self, f: F) -> Self
    where
        F: Fn(Elem) -> Elem + Send + Sync + 'static;

    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Elem) -> bool + Send + Sync + 'static;

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Elem) -> B;

    fn maximum(self) -> Option<Elem>;

    fn head(self) -> Option<Elem>;
}

pub trait Reverse: Traverse {
    fn reverse(self) -> Self;
}

/// Stable ascending sort.
pub trait Sort: Traverse {
    fn sort(self) -> Self;
}

/// Head/tail deconstruction, the shape pattern matching takes on each kind.
pub trait Deconstruct: Traverse {
    fn uncons(self) -> Option<(Elem, Self)>;
}
