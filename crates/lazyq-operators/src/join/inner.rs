//! Inner equi-join.
//!
//! The inner side is indexed once per application. The outer side streams:
//! each outer element emits one result per matching inner element, in the
//! inner side's order. Outer elements without a match emit nothing.

use std::rc::Rc;

use lazyq_core::sequence::{Cursor, IntoSeq, LazySeq, Sequence};

use crate::join::index::InnerIndex;
use crate::order::{KeyOrder, NaturalOrder};
use crate::plan::{Footprint, Materialization};
use crate::traits::Operator;

pub struct Join<TI, KO, KI, R, P> {
    inner: LazySeq<TI>,
    outer_key: KO,
    inner_key: KI,
    result: R,
    order: P,
}

pub fn join<S, TO, K, KO, KI, R, U>(
    inner: S,
    outer_key: KO,
    inner_key: KI,
    result: R,
) -> Join<S::Item, KO, KI, R, NaturalOrder>
where
    S: IntoSeq,
    KO: Fn(&TO) -> K,
    KI: Fn(&S::Item) -> K,
    R: Fn(&TO, &S::Item) -> U,
    K: Ord,
{
    Join {
        inner: inner.into_seq(),
        outer_key,
        inner_key,
        result,
        order: NaturalOrder,
    }
}

impl<TI, KO, KI, R, P> Join<TI, KO, KI, R, P> {
    /// Match keys with a caller strict weak order instead of `Ord`.
    pub fn using<Q>(self, order: Q) -> Join<TI, KO, KI, R, Q> {
        Join {
            inner: self.inner,
            outer_key: self.outer_key,
            inner_key: self.inner_key,
            result: self.result,
            order,
        }
    }
}

impl<TO, TI, K, U, KO, KI, R, P> Operator<TO> for Join<TI, KO, KI, R, P>
where
    TO: 'static,
    TI: 'static,
    K: 'static,
    U: 'static,
    KO: Fn(&TO) -> K + 'static,
    KI: Fn(&TI) -> K + 'static,
    R: Fn(&TO, &TI) -> U + 'static,
    P: KeyOrder<K> + 'static,
{
    type Output = LazySeq<U>;

    fn name(&self) -> &'static str {
        "join"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::SecondaryIndex)
    }

    fn apply(self, source: LazySeq<TO>) -> LazySeq<U> {
        LazySeq::new(JoinSeq(Rc::new(JoinState {
            outer: source,
            index: InnerIndex::new("join", self.inner, self.inner_key, self.order),
            outer_key: self.outer_key,
            result: self.result,
        })))
    }
}

struct JoinState<TO, TI, K, KO, KI, R, P> {
    outer: LazySeq<TO>,
    index: InnerIndex<TI, K, KI, P>,
    outer_key: KO,
    result: R,
}

struct JoinSeq<TO, TI, K, KO, KI, R, P>(Rc<JoinState<TO, TI, K, KO, KI, R, P>>);

impl<TO, TI, K, U, KO, KI, R, P> Sequence for JoinSeq<TO, TI, K, KO, KI, R, P>
where
    TO: 'static,
    TI: 'static,
    K: 'static,
    U: 'static,
    KO: Fn(&TO) -> K + 'static,
    KI: Fn(&TI) -> K + 'static,
    R: Fn(&TO, &TI) -> U + 'static,
    P: KeyOrder<K> + 'static,
{
    type Item = U;

    fn cursor(&self) -> Cursor<U> {
        Cursor::new(JoinCursor {
            upstream: self.0.outer.cursor(),
            state: Rc::clone(&self.0),
            pending: None,
        })
    }
}

/// The outer element currently being paired, and the next match to pair it with.
struct Pending<TO, TI> {
    outer: TO,
    matches: Rc<[TI]>,
    next: usize,
}

struct JoinCursor<TO, TI, K, KO, KI, R, P> {
    state: Rc<JoinState<TO, TI, K, KO, KI, R, P>>,
    upstream: Cursor<TO>,
    pending: Option<Pending<TO, TI>>,
}

impl<TO, TI, K, U, KO, KI, R, P> Iterator for JoinCursor<TO, TI, K, KO, KI, R, P>
where
    TI: 'static,
    KO: Fn(&TO) -> K,
    KI: Fn(&TI) -> K,
    R: Fn(&TO, &TI) -> U,
    P: KeyOrder<K>,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        loop {
            if let Some(pending) = self.pending.as_mut() {
                if let Some(inner) = pending.matches.get(pending.next) {
                    pending.next += 1;
                    return Some((self.state.result)(&pending.outer, inner));
                }
                self.pending = None;
            }
            let outer = self.upstream.next()?;
            let key = (self.state.outer_key)(&outer);
            if let Some(matches) = self.state.index.matches(key) {
                self.pending = Some(Pending {
                    outer,
                    matches: Rc::clone(matches),
                    next: 0,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ApplyExt;

    fn people() -> Vec<(u32, &'static str)> {
        vec![(1, "ann"), (2, "ben"), (3, "cat")]
    }

    fn pets() -> Vec<(u32, &'static str)> {
        vec![(3, "rex"), (1, "tom"), (3, "kit"), (9, "stray")]
    }

    #[test]
    fn pairs_every_match_in_inner_order() {
        let out = people()
            .apply(join(
                pets(),
                |p: &(u32, &str)| p.0,
                |a: &(u32, &str)| a.0,
                |p: &(u32, &str), a: &(u32, &str)| format!("{}:{}", p.1, a.1),
            ))
            .to_vec();
        assert_eq!(out, vec!["ann:tom", "cat:rex", "cat:kit"]);
    }

    #[test]
    fn custom_key_order() {
        let by_parity = |a: &u32, b: &u32| a % 2 < b % 2;
        let out = vec![10u32, 7]
            .apply(
                join(vec![1u32, 2, 3], |o: &u32| *o, |i: &u32| *i, |o: &u32, i: &u32| o * i)
                    .using(by_parity),
            )
            .to_vec();
        assert_eq!(out, vec![20, 7, 21]);
    }

    #[test]
    fn empty_outer_never_indexes_inner() {
        let inner = LazySeq::from_fn(|| -> Vec<u32> { panic!("inner pulled") });
        let out = Vec::<u32>::new()
            .apply(join(inner, |o: &u32| *o, |i: &u32| *i, |o: &u32, _: &u32| *o))
            .to_vec();
        assert!(out.is_empty());
    }
}
