//! Combination: `concat` and `zip`.
//!
//! Neither operator buffers anything. `concat` holds two live cursors and
//! drains them in order; `zip` pulls one element from each side per output.

use std::rc::Rc;

use lazyq_core::sequence::{Cursor, IntoSeq, LazySeq, Sequence};

use crate::plan::Footprint;
use crate::traits::Operator;

/// The primary sequence followed by `other`.
pub struct Concat<T> {
    other: LazySeq<T>,
}

pub fn concat<S: IntoSeq>(other: S) -> Concat<S::Item> {
    Concat {
        other: other.into_seq(),
    }
}

impl<T: 'static> Operator<T> for Concat<T> {
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "concat"
    }

    fn footprint(&self) -> Footprint {
        Footprint::streaming()
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        LazySeq::new(ConcatSeq {
            first: source,
            second: self.other,
        })
    }
}

struct ConcatSeq<T> {
    first: LazySeq<T>,
    second: LazySeq<T>,
}

impl<T: 'static> Sequence for ConcatSeq<T> {
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(self.first.cursor().chain(self.second.cursor()))
    }

    fn is_bidirectional(&self) -> bool {
        self.first.is_bidirectional() && self.second.is_bidirectional()
    }

    fn back_cursor(&self) -> Option<Cursor<T>> {
        let second = self.second.back_cursor()?;
        let first = self.first.back_cursor()?;
        Some(Cursor::new(second.chain(first)))
    }
}

/// Pairs elements in lockstep; stops when either side runs out.
pub struct Zip<U, F> {
    other: LazySeq<U>,
    combiner: F,
}

pub fn zip<S, T, R, F>(other: S, combiner: F) -> Zip<S::Item, F>
where
    S: IntoSeq,
    F: Fn(T, S::Item) -> R,
{
    Zip {
        other: other.into_seq(),
        combiner,
    }
}

impl<T, U, R, F> Operator<T> for Zip<U, F>
where
    T: 'static,
    U: 'static,
    R: 'static,
    F: Fn(T, U) -> R + 'static,
{
    type Output = LazySeq<R>;

    fn name(&self) -> &'static str {
        "zip"
    }

    fn footprint(&self) -> Footprint {
        Footprint::streaming()
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<R> {
        LazySeq::new(ZipSeq {
            first: source,
            second: self.other,
            combiner: Rc::new(self.combiner),
        })
    }
}

struct ZipSeq<T, U, F> {
    first: LazySeq<T>,
    second: LazySeq<U>,
    combiner: Rc<F>,
}

impl<T, U, R, F> Sequence for ZipSeq<T, U, F>
where
    T: 'static,
    U: 'static,
    R: 'static,
    F: Fn(T, U) -> R + 'static,
{
    type Item = R;

    fn cursor(&self) -> Cursor<R> {
        let combiner = Rc::clone(&self.combiner);
        Cursor::new(
            self.first
                .cursor()
                .zip(self.second.cursor())
                .map(move |(a, b)| combiner(a, b)),
        )
    }
}
