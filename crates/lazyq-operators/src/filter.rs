//! Filtering operators: `where`, `skip*`, `take*`.
//!
//! All three make a single upstream pass per cursor. `skip` and `take` cache
//! the length of the qualifying prefix in shared state, so only the first
//! cursor of an application ever evaluates the predicate on that prefix.

use std::rc::Rc;

use lazyq_core::sequence::{Cursor, LazySeq, Sequence};

use crate::plan::{Footprint, Materialization};
use crate::state::SharedState;
use crate::traits::{FirstN, IndexedPredicate, Indexless, Operator};

/// Keeps elements for which the predicate holds.
pub struct Where<P> {
    pred: P,
}

pub fn where_<T, F>(pred: F) -> Where<Indexless<F>>
where
    F: Fn(&T) -> bool,
{
    Where {
        pred: Indexless(pred),
    }
}

pub fn where_with_index<T, F>(pred: F) -> Where<F>
where
    F: Fn(&T, usize) -> bool,
{
    Where { pred }
}

impl<T, P> Operator<T> for Where<P>
where
    T: 'static,
    P: IndexedPredicate<T> + 'static,
{
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "where"
    }

    fn footprint(&self) -> Footprint {
        Footprint::streaming()
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        LazySeq::new(WhereSeq(Rc::new(WhereState {
            source,
            pred: self.pred,
        })))
    }
}

struct WhereState<T, P> {
    source: LazySeq<T>,
    pred: P,
}

struct WhereSeq<T, P>(Rc<WhereState<T, P>>);

impl<T, P> Sequence for WhereSeq<T, P>
where
    T: 'static,
    P: IndexedPredicate<T> + 'static,
{
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(WhereCursor {
            upstream: self.0.source.cursor(),
            state: Rc::clone(&self.0),
            index: 0,
        })
    }
}

struct WhereCursor<T, P> {
    state: Rc<WhereState<T, P>>,
    upstream: Cursor<T>,
    index: usize,
}

impl<T, P: IndexedPredicate<T>> Iterator for WhereCursor<T, P> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let item = self.upstream.next()?;
            let index = self.index;
            self.index += 1;
            if self.state.pred.test(&item, index) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }
}

/// Prefix scanning shared by `skip` and `take`.
struct PrefixState<T, P> {
    source: LazySeq<T>,
    pred: P,
    bound: SharedState<usize>,
}

impl<T: 'static, P: IndexedPredicate<T>> PrefixState<T, P> {
    fn new(op: &'static str, source: LazySeq<T>, pred: P) -> Self {
        Self {
            source,
            pred,
            bound: SharedState::new(op),
        }
    }

    /// Length of the prefix on which the predicate holds, scanned on a
    /// dedicated cursor the first time it is needed.
    fn bound(&self) -> usize {
        *self.bound.get_or_build(|| {
            let mut n = 0;
            for item in self.source.cursor() {
                if !self.pred.test(&item, n) {
                    break;
                }
                n += 1;
            }
            n
        })
    }
}

/// Drops the leading elements for which the predicate holds.
pub struct Skip<P> {
    pred: P,
}

pub fn skip(n: usize) -> Skip<FirstN> {
    Skip { pred: FirstN(n) }
}

pub fn skip_while<T, F>(pred: F) -> Skip<Indexless<F>>
where
    F: Fn(&T) -> bool,
{
    Skip {
        pred: Indexless(pred),
    }
}

pub fn skip_while_with_index<T, F>(pred: F) -> Skip<F>
where
    F: Fn(&T, usize) -> bool,
{
    Skip { pred }
}

impl<T, P> Operator<T> for Skip<P>
where
    T: 'static,
    P: IndexedPredicate<T> + 'static,
{
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "skip"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::PrefixBound)
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        LazySeq::new(SkipSeq(Rc::new(PrefixState::new(
            "skip", source, self.pred,
        ))))
    }
}

struct SkipSeq<T, P>(Rc<PrefixState<T, P>>);

impl<T, P> Sequence for SkipSeq<T, P>
where
    T: 'static,
    P: IndexedPredicate<T> + 'static,
{
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(SkipCursor {
            upstream: self.0.source.cursor(),
            state: Rc::clone(&self.0),
            started: false,
        })
    }
}

struct SkipCursor<T, P> {
    state: Rc<PrefixState<T, P>>,
    upstream: Cursor<T>,
    started: bool,
}

impl<T: 'static, P: IndexedPredicate<T>> SkipCursor<T, P> {
    /// Position `upstream` just past the prefix. The first cursor of the
    /// application scans with the predicate and records the bound; later
    /// cursors just advance by it.
    fn start(&mut self) -> Option<T> {
        if let Some(&n) = self.state.bound.get() {
            if n > 0 {
                self.upstream.nth(n - 1)?;
            }
            return self.upstream.next();
        }

        let mut n = 0;
        let mut first = None;
        for item in self.upstream.by_ref() {
            if !self.state.pred.test(&item, n) {
                first = Some(item);
                break;
            }
            n += 1;
        }
        self.state.bound.set(n);
        first
    }
}

impl<T: 'static, P: IndexedPredicate<T>> Iterator for SkipCursor<T, P> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if !self.started {
            self.started = true;
            return self.start();
        }
        self.upstream.next()
    }
}

/// Keeps the leading elements for which the predicate holds.
pub struct Take<P> {
    pred: P,
}

pub fn take(n: usize) -> Take<FirstN> {
    Take { pred: FirstN(n) }
}

pub fn take_while<T, F>(pred: F) -> Take<Indexless<F>>
where
    F: Fn(&T) -> bool,
{
    Take {
        pred: Indexless(pred),
    }
}

pub fn take_while_with_index<T, F>(pred: F) -> Take<F>
where
    F: Fn(&T, usize) -> bool,
{
    Take { pred }
}

impl<T, P> Operator<T> for Take<P>
where
    T: 'static,
    P: IndexedPredicate<T> + 'static,
{
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "take"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::PrefixBound)
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        LazySeq::new(TakeSeq(Rc::new(PrefixState::new(
            "take", source, self.pred,
        ))))
    }
}

struct TakeSeq<T, P>(Rc<PrefixState<T, P>>);

impl<T, P> Sequence for TakeSeq<T, P>
where
    T: 'static,
    P: IndexedPredicate<T> + 'static,
{
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(TakeCursor {
            upstream: self.0.source.cursor(),
            state: Rc::clone(&self.0),
            remaining: None,
        })
    }
}

struct TakeCursor<T, P> {
    state: Rc<PrefixState<T, P>>,
    upstream: Cursor<T>,
    remaining: Option<usize>,
}

impl<T: 'static, P: IndexedPredicate<T>> Iterator for TakeCursor<T, P> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let state = &self.state;
        let remaining = self.remaining.get_or_insert_with(|| state.bound());
        if *remaining == 0 {
            return None;
        }
        *remaining -= 1;
        self.upstream.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(n) => (0, Some(n)),
            None => (0, self.upstream.size_hint().1),
        }
    }
}
