use std::rc::Rc;

use lazyq_core::sequence::{Cursor, IntoSeq, LazySeq, Sequence};

use crate::order::{contains_by, KeyOrder, NaturalOrder};
use crate::plan::{Footprint, Materialization};
use crate::state::SharedState;
use crate::traits::Operator;

/// Elements of the primary sequence with no equivalent in `other`.
pub struct Except<T, P> {
    other: LazySeq<T>,
    order: P,
}

pub fn except<S: IntoSeq>(other: S) -> Except<S::Item, NaturalOrder> {
    Except {
        other: other.into_seq(),
        order: NaturalOrder,
    }
}

impl<T, P> Except<T, P> {
    /// `order` must be a strict weak order: it sorts and binary-searches `other`.
    pub fn using<Q>(self, order: Q) -> Except<T, Q> {
        Except {
            other: self.other,
            order,
        }
    }
}

impl<T, P> Operator<T> for Except<T, P>
where
    T: 'static,
    P: KeyOrder<T> + 'static,
{
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "except"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::SecondaryIndex)
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        MembershipState::new("except", source, self.other, self.order, false).into_seq()
    }
}

/// Elements of the primary sequence that have an equivalent in `other`.
pub struct Intersect<T, P> {
    other: LazySeq<T>,
    order: P,
}

pub fn intersect<S: IntoSeq>(other: S) -> Intersect<S::Item, NaturalOrder> {
    Intersect {
        other: other.into_seq(),
        order: NaturalOrder,
    }
}

impl<T, P> Intersect<T, P> {
    pub fn using<Q>(self, order: Q) -> Intersect<T, Q> {
        Intersect {
            other: self.other,
            order,
        }
    }
}

impl<T, P> Operator<T> for Intersect<T, P>
where
    T: 'static,
    P: KeyOrder<T> + 'static,
{
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "intersect"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::SecondaryIndex)
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        MembershipState::new("intersect", source, self.other, self.order, true).into_seq()
    }
}

struct MembershipState<T, P> {
    source: LazySeq<T>,
    other: LazySeq<T>,
    order: P,
    /// `true` keeps elements found in `other` (intersect), `false` drops them (except).
    keep_found: bool,
    sorted: SharedState<Vec<T>>,
}

impl<T: 'static, P: KeyOrder<T> + 'static> MembershipState<T, P> {
    fn new(
        op: &'static str,
        source: LazySeq<T>,
        other: LazySeq<T>,
        order: P,
        keep_found: bool,
    ) -> Self {
        Self {
            source,
            other,
            order,
            keep_found,
            sorted: SharedState::new(op),
        }
    }

    fn into_seq(self) -> LazySeq<T> {
        LazySeq::new(MembershipSeq(Rc::new(self)))
    }

    fn sorted(&self) -> &[T] {
        self.sorted.get_or_build(|| {
            let mut rows: Vec<T> = self.other.cursor().collect();
            rows.sort_by(|a, b| self.order.compare(a, b));
            rows
        })
    }
}

struct MembershipSeq<T, P>(Rc<MembershipState<T, P>>);

impl<T, P> Sequence for MembershipSeq<T, P>
where
    T: 'static,
    P: KeyOrder<T> + 'static,
{
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(MembershipCursor {
            upstream: self.0.source.cursor(),
            state: Rc::clone(&self.0),
        })
    }
}

struct MembershipCursor<T, P> {
    state: Rc<MembershipState<T, P>>,
    upstream: Cursor<T>,
}

impl<T: 'static, P: KeyOrder<T> + 'static> Iterator for MembershipCursor<T, P> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let sorted = self.state.sorted();
        loop {
            let item = self.upstream.next()?;
            if contains_by(sorted, &item, &self.state.order) == self.state.keep_found {
                return Some(item);
            }
        }
    }
}
