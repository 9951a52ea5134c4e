//! `order_by` descriptors and the sorted sequence they produce.
//!
//! The sort happens once per application, on the first pull of any cursor:
//! every source element is copied into a buffer and stably sorted by the fully
//! composed comparator chain. Stability holds for the composed order only.

use std::rc::Rc;

use lazyq_core::sequence::{Cursor, IntoSeq, LazySeq, Sequence};

use crate::order::{KeyOrder, NaturalOrder};
use crate::plan::{Footprint, Materialization};
use crate::sort::comparator::{Comparator, Direction, KeyComparator, TieBreak};
use crate::state::{DeferredCursor, SharedState};
use crate::traits::Operator;

/// An unapplied ordering: one or more keys, most significant first.
pub struct OrderBy<C> {
    cmp: C,
}

pub fn order_by<T, K, F>(key: F) -> OrderBy<KeyComparator<F, NaturalOrder>>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    OrderBy {
        cmp: KeyComparator::new(key, NaturalOrder, Direction::Ascending),
    }
}

pub fn order_by_descending<T, K, F>(key: F) -> OrderBy<KeyComparator<F, NaturalOrder>>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    OrderBy {
        cmp: KeyComparator::new(key, NaturalOrder, Direction::Descending),
    }
}

/// Ascending by `key` under a caller strict weak order.
pub fn order_by_using<T, K, F, P>(key: F, order: P) -> OrderBy<KeyComparator<F, P>>
where
    F: Fn(&T) -> K,
    P: KeyOrder<K>,
{
    OrderBy {
        cmp: KeyComparator::new(key, order, Direction::Ascending),
    }
}

impl<C> OrderBy<C> {
    pub fn then_by<T, K, F>(self, key: F) -> OrderBy<TieBreak<C, KeyComparator<F, NaturalOrder>>>
    where
        F: Fn(&T) -> K,
        K: Ord,
    {
        self.then(KeyComparator::new(key, NaturalOrder, Direction::Ascending))
    }

    pub fn then_by_descending<T, K, F>(
        self,
        key: F,
    ) -> OrderBy<TieBreak<C, KeyComparator<F, NaturalOrder>>>
    where
        F: Fn(&T) -> K,
        K: Ord,
    {
        self.then(KeyComparator::new(key, NaturalOrder, Direction::Descending))
    }

    pub fn then_by_using<T, K, F, P>(
        self,
        key: F,
        order: P,
    ) -> OrderBy<TieBreak<C, KeyComparator<F, P>>>
    where
        F: Fn(&T) -> K,
        P: KeyOrder<K>,
    {
        self.then(KeyComparator::new(key, order, Direction::Ascending))
    }

    fn then<N>(self, next: N) -> OrderBy<TieBreak<C, N>> {
        OrderBy {
            cmp: TieBreak::new(self.cmp, next),
        }
    }
}

impl<T, C> Operator<T> for OrderBy<C>
where
    T: Clone + 'static,
    C: Comparator<T> + 'static,
{
    type Output = OrderedSeq<T, C>;

    fn name(&self) -> &'static str {
        "order_by"
    }

    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::FullSource)
    }

    fn apply(self, source: LazySeq<T>) -> OrderedSeq<T, C> {
        OrderedSeq::new(source, Rc::new(self.cmp))
    }
}

struct OrderState<T, C> {
    source: LazySeq<T>,
    cmp: Rc<C>,
    sorted: SharedState<Rc<[T]>>,
}

impl<T, C> OrderState<T, C>
where
    T: Clone + 'static,
    C: Comparator<T>,
{
    fn sorted(&self) -> Rc<[T]> {
        let sorted = self.sorted.get_or_build(|| {
            let mut rows: Vec<T> = self.source.cursor().collect();
            rows.sort_by(|a, b| self.cmp.compare(a, b));
            Rc::from(rows)
        });
        Rc::clone(sorted)
    }
}

/// Result of applying an ordering. Backward capable.
///
/// Further keys can still be added with `then_by*`: that creates a new
/// application over the same source with the extended chain.
pub struct OrderedSeq<T, C> {
    state: Rc<OrderState<T, C>>,
}

impl<T, C> OrderedSeq<T, C>
where
    T: Clone + 'static,
    C: Comparator<T> + 'static,
{
    fn new(source: LazySeq<T>, cmp: Rc<C>) -> Self {
        Self {
            state: Rc::new(OrderState {
                source,
                cmp,
                sorted: SharedState::new("order_by"),
            }),
        }
    }

    pub fn then_by<K, F>(
        &self,
        key: F,
    ) -> OrderedSeq<T, TieBreak<Rc<C>, KeyComparator<F, NaturalOrder>>>
    where
        F: Fn(&T) -> K + 'static,
        K: Ord,
    {
        self.then(KeyComparator::new(key, NaturalOrder, Direction::Ascending))
    }

    pub fn then_by_descending<K, F>(
        &self,
        key: F,
    ) -> OrderedSeq<T, TieBreak<Rc<C>, KeyComparator<F, NaturalOrder>>>
    where
        F: Fn(&T) -> K + 'static,
        K: Ord,
    {
        self.then(KeyComparator::new(key, NaturalOrder, Direction::Descending))
    }

    pub fn then_by_using<K, F, P>(
        &self,
        key: F,
        order: P,
    ) -> OrderedSeq<T, TieBreak<Rc<C>, KeyComparator<F, P>>>
    where
        F: Fn(&T) -> K + 'static,
        P: KeyOrder<K> + 'static,
    {
        self.then(KeyComparator::new(key, order, Direction::Ascending))
    }

    fn then<N>(&self, next: N) -> OrderedSeq<T, TieBreak<Rc<C>, N>>
    where
        N: Comparator<T> + 'static,
    {
        let cmp = TieBreak::new(Rc::clone(&self.state.cmp), next);
        OrderedSeq::new(self.state.source.clone(), Rc::new(cmp))
    }

    /// Whether the sorted buffer of this application exists yet.
    pub fn is_sorted(&self) -> bool {
        self.state.sorted.is_built()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.cursor().collect()
    }
}

impl<T, C> Sequence for OrderedSeq<T, C>
where
    T: Clone + 'static,
    C: Comparator<T> + 'static,
{
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        let state = Rc::clone(&self.state);
        Cursor::new(DeferredCursor::forward(move || state.sorted()))
    }

    fn is_bidirectional(&self) -> bool {
        true
    }

    fn back_cursor(&self) -> Option<Cursor<T>> {
        let state = Rc::clone(&self.state);
        Some(Cursor::new(DeferredCursor::backward(move || state.sorted())))
    }
}

impl<T, C> Clone for OrderedSeq<T, C> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T, C> IntoSeq for OrderedSeq<T, C>
where
    T: Clone + 'static,
    C: Comparator<T> + 'static,
{
    type Item = T;

    fn into_seq(self) -> LazySeq<T> {
        LazySeq::new(self)
    }
}

impl<T, C> IntoIterator for OrderedSeq<T, C>
where
    T: Clone + 'static,
    C: Comparator<T> + 'static,
{
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Cursor<T> {
        self.cursor()
    }
}
