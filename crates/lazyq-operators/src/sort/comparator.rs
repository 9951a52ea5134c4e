//! Tri-valued comparators composed left to right.
//!
//! Each sort key contributes one [`KeyComparator`] with its direction fixed at
//! construction. A further key wraps the chain built so far in a [`TieBreak`],
//! which only consults the new key when the chain reports `Equal`.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::order::KeyOrder;

pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for Rc<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Compares elements by a projected key under a key order.
pub struct KeyComparator<F, P> {
    key: F,
    order: P,
    direction: Direction,
}

impl<F, P> KeyComparator<F, P> {
    pub fn new(key: F, order: P, direction: Direction) -> Self {
        Self {
            key,
            order,
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<T, K, F, P> Comparator<T> for KeyComparator<F, P>
where
    F: Fn(&T) -> K,
    P: KeyOrder<K>,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        let ord = self.order.compare(&(self.key)(a), &(self.key)(b));
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// `primary`, falling through to `secondary` on equality.
pub struct TieBreak<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> TieBreak<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<T, A, B> Comparator<T> for TieBreak<A, B>
where
    A: Comparator<T>,
    B: Comparator<T>,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.primary
            .compare(a, b)
            .then_with(|| self.secondary.compare(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NaturalOrder;
    use std::cell::Cell;

    #[test]
    fn descending_flips_the_key_order() {
        let asc = KeyComparator::new(|x: &i32| *x, NaturalOrder, Direction::Ascending);
        let desc = KeyComparator::new(|x: &i32| *x, NaturalOrder, Direction::Descending);
        assert_eq!(asc.compare(&1, &2), Ordering::Less);
        assert_eq!(desc.compare(&1, &2), Ordering::Greater);
        assert_eq!(desc.compare(&2, &2), Ordering::Equal);
        assert_eq!(desc.direction(), Direction::Descending);
    }

    #[test]
    fn secondary_only_runs_on_ties() {
        let calls = Cell::new(0);
        let by_len = KeyComparator::new(|s: &&str| s.len(), NaturalOrder, Direction::Ascending);
        let counted = KeyComparator::new(
            |s: &&str| {
                calls.set(calls.get() + 1);
                s.to_string()
            },
            NaturalOrder,
            Direction::Ascending,
        );
        let chain = TieBreak::new(by_len, counted);
        assert_eq!(chain.compare(&"a", &"bb"), Ordering::Less);
        assert_eq!(calls.get(), 0);
        assert_eq!(chain.compare(&"bb", &"ab"), Ordering::Greater);
        assert_eq!(calls.get(), 2);
    }
}
