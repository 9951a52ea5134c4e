//! Key orders: strict weak orders supplied by the caller.
//!
//! Ordered containers cannot hold a bare closure as their ordering, so keys are
//! wrapped in [`Keyed`], which carries a shared handle to the caller's order.

use std::cmp::Ordering;
use std::rc::Rc;

/// `precedes(a, b)` means "a strictly precedes b". Must be a strict weak
/// order wherever it backs a sorted buffer or an ordered map.
pub trait KeyOrder<K: ?Sized> {
    fn precedes(&self, a: &K, b: &K) -> bool;

    /// Tri-valued view: `Equal` when neither precedes the other.
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if self.precedes(a, b) {
            Ordering::Less
        } else if self.precedes(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The key's own `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> KeyOrder<K> for NaturalOrder {
    fn precedes(&self, a: &K, b: &K) -> bool {
        a < b
    }

    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> KeyOrder<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    fn precedes(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// A key ordered by a caller-owned `KeyOrder` instead of its own `Ord`.
pub(crate) struct Keyed<K, P> {
    key: K,
    order: Rc<P>,
}

impl<K, P> Keyed<K, P> {
    pub(crate) fn new(key: K, order: &Rc<P>) -> Self {
        Self {
            key,
            order: Rc::clone(order),
        }
    }

    pub(crate) fn into_key(self) -> K {
        self.key
    }
}

impl<K, P: KeyOrder<K>> Ord for Keyed<K, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.compare(&self.key, &other.key)
    }
}

impl<K, P: KeyOrder<K>> PartialOrd for Keyed<K, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, P: KeyOrder<K>> PartialEq for Keyed<K, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K, P: KeyOrder<K>> Eq for Keyed<K, P> {}

/// Binary search in a slice sorted by `order`.
pub(crate) fn contains_by<T, P: KeyOrder<T>>(sorted: &[T], probe: &T, order: &P) -> bool {
    sorted
        .binary_search_by(|candidate| order.compare(candidate, probe))
        .is_ok()
}
