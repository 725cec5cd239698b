//! Memoizing lazy cons sequence.
//!
//! A `LazySeq` is a chain of shared cells. Each cell starts out suspended (a
//! thunk producing the head and the rest of the sequence) and is evaluated at
//! most once; later readers see the memoized step. `mapped` and `filtered`
//! only build new suspended cells, so nothing upstream is touched until a
//! consumer forces the result.
//!
//! Forcing and dropping are iterative: a sequence of any length can be walked
//! or released without recursion proportional to its length.

use super::{ContainerKind, Deconstruct, Elem, Reverse, Sort, Traverse};
use crate::fixture::{Fixture, FixtureData};
use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::{Arc, Mutex};

type Step<T> = Option<(T, LazySeq<T>)>;
type Thunk<T> = Box<dyn FnOnce() -> Step<T> + Send>;
type SharedMap<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
type SharedPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

struct Cell<T> {
    step: OnceCell<Step<T>>,
    thunk: Mutex<Option<Thunk<T>>>,
}

impl<T> Cell<T> {
    fn detach_tail(&mut self) -> Option<LazySeq<T>> {
        self.step.take().flatten().map(|(_, tail)| tail)
    }
}

pub struct LazySeq<T> {
    cell: Arc<Cell<T>>,
}

impl<T> LazySeq<T> {
    fn with_cell(step: OnceCell<Step<T>>, thunk: Option<Thunk<T>>) -> Self {
        Self {
            cell: Arc::new(Cell {
                step,
                thunk: Mutex::new(thunk),
            }),
        }
    }

    /// Whether this cell's step has been computed.
    pub fn is_evaluated(&self) -> bool {
        self.cell.step.get().is_some()
    }

    fn step(&self) -> &Step<T> {
        self.cell.step.get_or_init(|| {
            // The thunk is taken before it runs, so a cell whose thunk
            // panicked reads as the end of the sequence.
            let thunk = self.cell.thunk.lock().ok().and_then(|mut slot| slot.take());
            thunk.and_then(|produce| produce())
        })
    }
}

impl<T: Clone + Send + Sync + 'static> LazySeq<T> {
    pub fn nil() -> Self {
        Self::with_cell(OnceCell::with_value(None), None)
    }

    /// An already evaluated cell.
    pub fn cons(head: T, tail: Self) -> Self {
        Self::with_cell(OnceCell::with_value(Some((head, tail))), None)
    }

    pub fn suspend<F>(produce: F) -> Self
    where
        F: FnOnce() -> Step<T> + Send + 'static,
    {
        Self::with_cell(OnceCell::new(), Some(Box::new(produce)))
    }

    /// Lazily draws elements from `source` as cells are forced.
    pub fn from_source<I>(source: I) -> Self
    where
        I: Iterator<Item = T> + Send + 'static,
    {
        Self::suspend(move || {
            let mut source = source;
            let head = source.next()?;
            Some((head, Self::from_source(source)))
        })
    }

    /// Forces the head cell and returns the head with the rest of the sequence.
    pub fn force(&self) -> Option<(T, Self)> {
        self.step().as_ref().map(|(head, tail)| (head.clone(), tail.clone()))
    }

    /// Forces every cell. Returns the number of elements.
    pub fn force_all(&self) -> usize {
        let mut forced = 0;
        let mut cursor = self.clone();
        while let Some((_, tail)) = cursor.step() {
            let tail = tail.clone();
            cursor = tail;
            forced += 1;
        }
        forced
    }

    pub fn iter(&self) -> LazyIter<T> {
        LazyIter { cursor: self.clone() }
    }

    pub fn mapped<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.map_shared(Arc::new(f))
    }

    pub fn filtered<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_shared(Arc::new(predicate))
    }

    fn map_shared(&self, f: SharedMap<T>) -> Self {
        let upstream = self.clone();
        Self::suspend(move || {
            let (head, tail) = upstream.force()?;
            let mapped_tail = tail.map_shared(Arc::clone(&f));
            Some((f(head), mapped_tail))
        })
    }

    fn filter_shared(&self, predicate: SharedPredicate<T>) -> Self {
        let upstream = self.clone();
        Self::suspend(move || {
            let mut cursor = upstream;
            loop {
                let (head, tail) = cursor.force()?;
                if predicate(&head) {
                    let filtered_tail = tail.filter_shared(Arc::clone(&predicate));
                    return Some((head, filtered_tail));
                }
                cursor = tail;
            }
        })
    }
}

impl<T> Clone for LazySeq<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Drop for LazySeq<T> {
    fn drop(&mut self) {
        // Unlink uniquely owned tails one at a time so long chains do not
        // drop recursively.
        let mut next = Arc::get_mut(&mut self.cell).and_then(Cell::detach_tail);
        while let Some(mut seq) = next {
            next = Arc::get_mut(&mut seq.cell).and_then(Cell::detach_tail);
        }
    }
}

impl<T> fmt::Debug for LazySeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySeq").field("evaluated", &self.is_evaluated()).finish()
    }
}

/// Iterator that forces cells as it advances.
pub struct LazyIter<T> {
    cursor: LazySeq<T>,
}

impl<T: Clone + Send + Sync + 'static> Iterator for LazyIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let (head, tail) = self.cursor.force()?;
        self.cursor = tail;
        Some(head)
    }
}

impl Traverse for LazySeq<Elem> {
    const KIND: ContainerKind = ContainerKind::Lazy;

    fn from_fixture(fixture: &Fixture) -> Result<Self> {
        match fixture.data() {
            FixtureData::Lazy(seq) => Ok(seq.clone()),
            _ => Err(anyhow!("lazy scenario received a {} fixture", fixture.kind())),
        }
    }

    fn map<F>(self, f: F) -> Self
    where
        F: Fn(Elem) -> Elem + Send + Sync + 'static,
    {
        self.mapped(f)
    }

    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Elem) -> bool + Send + Sync + 'static,
    {
        self.filtered(predicate)
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Elem) -> B,
    {
        self.iter().fold(init, f)
    }

    fn maximum(self) -> Option<Elem> {
        self.iter().max()
    }

    fn head(self) -> Option<Elem> {
        self.force().map(|(head, _)| head)
    }
}

impl Reverse for LazySeq<Elem> {
    fn reverse(self) -> Self {
        self.iter().fold(LazySeq::nil(), |reversed, x| LazySeq::cons(x, reversed))
    }
}

impl Sort for LazySeq<Elem> {
    fn sort(self) -> Self {
        let mut buffer: Vec<Elem> = self.iter().collect();
        buffer.sort();
        LazySeq::from_source(buffer.into_iter())
    }
}

impl Deconstruct for LazySeq<Elem> {
    fn uncons(self) -> Option<(Elem, Self)> {
        self.force()
    }
}
