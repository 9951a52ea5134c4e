use std::collections::BTreeSet;
use std::rc::Rc;

use lazyq_core::sequence::{Cursor, IntoSeq, LazySeq, Sequence};

use crate::order::{KeyOrder, Keyed, NaturalOrder};
use crate::plan::Footprint;
use crate::traits::Operator;

/// Yields the first element of every equivalence class.
pub struct Distinct<P> {
    order: P,
}

pub fn distinct() -> Distinct<NaturalOrder> {
    Distinct {
        order: NaturalOrder,
    }
}

impl<P> Distinct<P> {
    /// Use `order` (a strict weak order) to decide which elements are the same.
    pub fn using<Q>(self, order: Q) -> Distinct<Q> {
        Distinct { order }
    }
}

impl<T, P> Operator<T> for Distinct<P>
where
    T: Clone + 'static,
    P: KeyOrder<T> + 'static,
{
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "distinct"
    }

    fn footprint(&self) -> Footprint {
        Footprint::streaming().with_cursor_buffer()
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        LazySeq::new(DistinctSeq {
            first: source,
            second: LazySeq::empty(),
            order: Rc::new(self.order),
        })
    }
}

/// Elements of the primary then the secondary sequence, without duplicates
/// across either of them.
pub struct UnionWith<T, P> {
    other: LazySeq<T>,
    order: P,
}

pub fn union_with<S: IntoSeq>(other: S) -> UnionWith<S::Item, NaturalOrder> {
    UnionWith {
        other: other.into_seq(),
        order: NaturalOrder,
    }
}

impl<T, P> UnionWith<T, P> {
    pub fn using<Q>(self, order: Q) -> UnionWith<T, Q> {
        UnionWith {
            other: self.other,
            order,
        }
    }
}

impl<T, P> Operator<T> for UnionWith<T, P>
where
    T: Clone + 'static,
    P: KeyOrder<T> + 'static,
{
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "union"
    }

    fn footprint(&self) -> Footprint {
        Footprint::streaming().with_cursor_buffer()
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        LazySeq::new(DistinctSeq {
            first: source,
            second: self.other,
            order: Rc::new(self.order),
        })
    }
}

/// Both operators drain `first` then `second` through one seen-set, so a
/// distinct is simply a union with the empty sequence.
struct DistinctSeq<T, P> {
    first: LazySeq<T>,
    second: LazySeq<T>,
    order: Rc<P>,
}

impl<T, P> Sequence for DistinctSeq<T, P>
where
    T: Clone + 'static,
    P: KeyOrder<T> + 'static,
{
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(DistinctCursor {
            upstream: self.first.cursor().chain(self.second.cursor()),
            seen: BTreeSet::new(),
            order: Rc::clone(&self.order),
        })
    }
}

struct DistinctCursor<T, P> {
    upstream: std::iter::Chain<Cursor<T>, Cursor<T>>,
    seen: BTreeSet<Keyed<T, P>>,
    order: Rc<P>,
}

impl<T: Clone, P: KeyOrder<T>> Iterator for DistinctCursor<T, P> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let item = self.upstream.next()?;
            if self.seen.insert(Keyed::new(item.clone(), &self.order)) {
                return Some(item);
            }
        }
    }
}
