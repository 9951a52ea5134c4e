//! Grouping by key.
//!
//! On the first pull every source element is projected into its key's group
//! (groups keep insertion order). The result selector then runs once per
//! distinct key, in key order, and its outputs are buffered for all cursors.

use std::rc::Rc;

use lazyq_core::sequence::{Cursor, LazySeq, Sequence};

use crate::join::index::build_groups;
use crate::order::{KeyOrder, NaturalOrder};
use crate::plan::{Footprint, Materialization};
use crate::state::{DeferredCursor, SharedState};
use crate::traits::Operator;

/// Default value selector: the element itself.
pub type Identity<T> = fn(&T) -> T;

/// Default result selector: the key and a view over its group.
pub type Pair<K, V> = fn(K, LazySeq<V>) -> (K, LazySeq<V>);

pub struct GroupBy<KS, VS, RS, P> {
    key: KS,
    value: VS,
    result: RS,
    order: P,
}

fn pair_of<K, V>(key: K, values: LazySeq<V>) -> (K, LazySeq<V>) {
    (key, values)
}

/// `(key, elements)` for every distinct key.
pub fn group_by<T, K, KS>(key: KS) -> GroupBy<KS, Identity<T>, Pair<K, T>, NaturalOrder>
where
    T: Clone,
    KS: Fn(&T) -> K,
    K: Ord,
{
    GroupBy {
        key,
        value: T::clone,
        result: pair_of,
        order: NaturalOrder,
    }
}

/// `(key, projected values)` for every distinct key.
pub fn group_values_by<T, K, V, KS, VS>(
    key: KS,
    value: VS,
) -> GroupBy<KS, VS, Pair<K, V>, NaturalOrder>
where
    KS: Fn(&T) -> K,
    VS: Fn(&T) -> V,
    K: Ord,
{
    GroupBy {
        key,
        value,
        result: pair_of,
        order: NaturalOrder,
    }
}

/// `result(key, elements)` for every distinct key.
pub fn group_by_and_fold<T, K, U, KS, RS>(
    key: KS,
    result: RS,
) -> GroupBy<KS, Identity<T>, RS, NaturalOrder>
where
    T: Clone,
    KS: Fn(&T) -> K,
    RS: Fn(K, LazySeq<T>) -> U,
    K: Ord,
{
    GroupBy {
        key,
        value: T::clone,
        result,
        order: NaturalOrder,
    }
}

pub fn group_values_by_and_fold<T, K, V, U, KS, VS, RS>(
    key: KS,
    value: VS,
    result: RS,
) -> GroupBy<KS, VS, RS, NaturalOrder>
where
    KS: Fn(&T) -> K,
    VS: Fn(&T) -> V,
    RS: Fn(K, LazySeq<V>) -> U,
    K: Ord,
{
    GroupBy {
        key,
        value,
        result,
        order: NaturalOrder,
    }
}

impl<KS, VS, RS, P> GroupBy<KS, VS, RS, P> {
    /// Order and merge keys with a caller strict weak order.
    pub fn using<Q>(self, order: Q) -> GroupBy<KS, VS, RS, Q> {
        GroupBy {
            key: self.key,
            value: self.value,
            result: self.result,
            order,
        }
    }
}

impl<T, K, V, U, KS, VS, RS, P> Operator<T> for GroupBy<KS, VS, RS, P>
where
    T: 'static,
    K: 'static,
    V: Clone + 'static,
    U: Clone + 'static,
    KS: Fn(&T) -> K + 'static,
    VS: Fn(&T) -> V + 'static,
    RS: Fn(K, LazySeq<V>) -> U + 'static,
    P: KeyOrder<K> + 'static,
{
    type Output = LazySeq<U>;

    fn name(&self) -> &'static str {
        "group_by"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::FullSource)
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<U> {
        LazySeq::new(GroupSeq(Rc::new(GroupState {
            source,
            key: self.key,
            value: self.value,
            result: self.result,
            order: Rc::new(self.order),
            results: SharedState::new("group_by"),
        })))
    }
}

struct GroupState<T, U, KS, VS, RS, P> {
    source: LazySeq<T>,
    key: KS,
    value: VS,
    result: RS,
    order: Rc<P>,
    results: SharedState<Rc<[U]>>,
}

impl<T, K, V, U, KS, VS, RS, P> GroupState<T, U, KS, VS, RS, P>
where
    T: 'static,
    V: Clone + 'static,
    KS: Fn(&T) -> K,
    VS: Fn(&T) -> V,
    RS: Fn(K, LazySeq<V>) -> U,
    P: KeyOrder<K>,
{
    fn results(&self) -> Rc<[U]> {
        let results = self.results.get_or_build(|| {
            build_groups(
                self.source.cursor(),
                &self.key,
                |item| (self.value)(&item),
                &self.order,
            )
            .into_iter()
            .map(|(key, values)| (self.result)(key.into_key(), LazySeq::from_vec(values)))
            .collect()
        });
        Rc::clone(results)
    }
}

struct GroupSeq<T, U, KS, VS, RS, P>(Rc<GroupState<T, U, KS, VS, RS, P>>);

impl<T, K, V, U, KS, VS, RS, P> Sequence for GroupSeq<T, U, KS, VS, RS, P>
where
    T: 'static,
    K: 'static,
    V: Clone + 'static,
    U: Clone + 'static,
    KS: Fn(&T) -> K + 'static,
    VS: Fn(&T) -> V + 'static,
    RS: Fn(K, LazySeq<V>) -> U + 'static,
    P: KeyOrder<K> + 'static,
{
    type Item = U;

    fn cursor(&self) -> Cursor<U> {
        let state = Rc::clone(&self.0);
        Cursor::new(DeferredCursor::forward(move || state.results()))
    }

    fn is_bidirectional(&self) -> bool {
        true
    }

    fn back_cursor(&self) -> Option<Cursor<U>> {
        let state = Rc::clone(&self.0);
        Some(Cursor::new(DeferredCursor::backward(move || state.results())))
    }
}
