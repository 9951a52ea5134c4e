//! Group join: every outer element paired with a view over all its matches.

use std::rc::Rc;

use lazyq_core::sequence::{Cursor, IntoSeq, LazySeq, Sequence};

use crate::join::index::InnerIndex;
use crate::order::{KeyOrder, NaturalOrder};
use crate::plan::{Footprint, Materialization};
use crate::traits::Operator;

/// Emits exactly one result per outer element. Unmatched outer elements get
/// the empty sequence.
pub struct GroupJoin<TI, KO, KI, R, P> {
    inner: LazySeq<TI>,
    outer_key: KO,
    inner_key: KI,
    result: R,
    order: P,
}

pub fn group_join<S, TO, K, KO, KI, R, U>(
    inner: S,
    outer_key: KO,
    inner_key: KI,
    result: R,
) -> GroupJoin<S::Item, KO, KI, R, NaturalOrder>
where
    S: IntoSeq,
    KO: Fn(&TO) -> K,
    KI: Fn(&S::Item) -> K,
    R: Fn(&TO, LazySeq<S::Item>) -> U,
    K: Ord,
{
    GroupJoin {
        inner: inner.into_seq(),
        outer_key,
        inner_key,
        result,
        order: NaturalOrder,
    }
}

impl<TI, KO, KI, R, P> GroupJoin<TI, KO, KI, R, P> {
    pub fn using<Q>(self, order: Q) -> GroupJoin<TI, KO, KI, R, Q> {
        GroupJoin {
            inner: self.inner,
            outer_key: self.outer_key,
            inner_key: self.inner_key,
            result: self.result,
            order,
        }
    }
}

impl<TO, TI, K, U, KO, KI, R, P> Operator<TO> for GroupJoin<TI, KO, KI, R, P>
where
    TO: 'static,
    TI: Clone + 'static,
    K: 'static,
    U: 'static,
    KO: Fn(&TO) -> K + 'static,
    KI: Fn(&TI) -> K + 'static,
    R: Fn(&TO, LazySeq<TI>) -> U + 'static,
    P: KeyOrder<K> + 'static,
{
    type Output = LazySeq<U>;

    fn name(&self) -> &'static str {
        "group_join"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::SecondaryIndex)
    }

    fn apply(self, source: LazySeq<TO>) -> LazySeq<U> {
        LazySeq::new(GroupJoinSeq(Rc::new(GroupJoinState {
            outer: source,
            index: InnerIndex::new("group_join", self.inner, self.inner_key, self.order),
            outer_key: self.outer_key,
            result: self.result,
        })))
    }
}

struct GroupJoinState<TO, TI, K, KO, KI, R, P> {
    outer: LazySeq<TO>,
    index: InnerIndex<TI, K, KI, P>,
    outer_key: KO,
    result: R,
}

impl<TO, TI, K, U, KO, KI, R, P> GroupJoinState<TO, TI, K, KO, KI, R, P>
where
    TI: Clone + 'static,
    KO: Fn(&TO) -> K,
    KI: Fn(&TI) -> K,
    R: Fn(&TO, LazySeq<TI>) -> U,
    P: KeyOrder<K>,
{
    fn resolve(&self, outer: TO) -> U {
        let group = match self.index.matches((self.outer_key)(&outer)) {
            Some(matches) => LazySeq::new(Rc::clone(matches)),
            None => LazySeq::empty(),
        };
        (self.result)(&outer, group)
    }
}

struct GroupJoinSeq<TO, TI, K, KO, KI, R, P>(Rc<GroupJoinState<TO, TI, K, KO, KI, R, P>>);

impl<TO, TI, K, U, KO, KI, R, P> Sequence for GroupJoinSeq<TO, TI, K, KO, KI, R, P>
where
    TO: 'static,
    TI: Clone + 'static,
    K: 'static,
    U: 'static,
    KO: Fn(&TO) -> K + 'static,
    KI: Fn(&TI) -> K + 'static,
    R: Fn(&TO, LazySeq<TI>) -> U + 'static,
    P: KeyOrder<K> + 'static,
{
    type Item = U;

    fn cursor(&self) -> Cursor<U> {
        let state = Rc::clone(&self.0);
        Cursor::new(self.0.outer.cursor().map(move |outer| state.resolve(outer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ApplyExt;

    #[test]
    fn one_result_per_outer_element() {
        let orders = vec![(1u32, 10), (3, 5), (1, 7)];
        let out = vec![1u32, 2, 3]
            .apply(group_join(
                orders,
                |c: &u32| *c,
                |o: &(u32, i32)| o.0,
                |c: &u32, os: LazySeq<(u32, i32)>| (*c, os.iter().map(|o| o.1).sum::<i32>()),
            ))
            .to_vec();
        assert_eq!(out, vec![(1, 17), (2, 0), (3, 5)]);
    }

    #[test]
    fn unmatched_outer_gets_the_empty_instance() {
        let out = vec![1, 2]
            .apply(group_join(
                vec![2, 2],
                |o: &i32| *o,
                |i: &i32| *i,
                |_: &i32, group: LazySeq<i32>| {
                    (group.is_empty_instance(), group.is_bidirectional())
                },
            ))
            .to_vec();
        assert_eq!(out, vec![(true, true), (false, true)]);
    }

    #[test]
    fn owned_results_collect_matches() {
        let tags = vec![(1u32, "red".to_string()), (1, "blue".to_string())];
        let out = vec![1u32, 2]
            .apply(group_join(
                tags,
                |id: &u32| *id,
                |t: &(u32, String)| t.0,
                |id: &u32, ts: LazySeq<(u32, String)>| {
                    let names: Vec<String> = ts.iter().map(|t| t.1).collect();
                    format!("{id}:{}", names.join("+"))
                },
            ))
            .to_vec();
        assert_eq!(out, vec!["1:red+blue".to_string(), "2:".to_string()]);
    }
}
