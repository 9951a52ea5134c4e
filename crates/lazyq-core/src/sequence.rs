//! The sequence contract and the type-erased lazy sequence.
//!
//! Every operator consumes a [`LazySeq`] and produces something that satisfies
//! [`Sequence`] again, so outputs can feed further operators. A sequence hands
//! out any number of independent [`Cursor`]s; creating one never pulls.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use crate::buffer::BufferCursor;

/// Owned, type-erased pull cursor. `None` from `next` marks end of data.
pub struct Cursor<T> {
    inner: Box<dyn Iterator<Item = T>>,
}

impl<T> Cursor<T> {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }
}

impl<T: 'static> Cursor<T> {
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("size_hint", &self.inner.size_hint())
            .finish()
    }
}

/// Minimal capability of any input or output sequence.
///
/// Invariants:
/// - `cursor` may be called any number of times; each cursor is independent.
/// - `back_cursor` returns `Some` iff `is_bidirectional` is true, and then
///   yields the same elements last-to-first.
/// - Neither call pulls an element or runs caller code.
pub trait Sequence {
    type Item;

    /// Fresh forward cursor positioned before the first element.
    fn cursor(&self) -> Cursor<Self::Item>;

    /// Whether backward traversal is available.
    fn is_bidirectional(&self) -> bool {
        false
    }

    /// Fresh cursor walking from the last element to the first.
    fn back_cursor(&self) -> Option<Cursor<Self::Item>> {
        None
    }
}

impl<T: Clone + 'static> Sequence for Rc<[T]> {
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(BufferCursor::new(Rc::clone(self)))
    }

    fn is_bidirectional(&self) -> bool {
        true
    }

    fn back_cursor(&self) -> Option<Cursor<T>> {
        Some(Cursor::new(BufferCursor::new(Rc::clone(self)).rev()))
    }
}

impl<A> Sequence for Range<A>
where
    A: 'static,
    Range<A>: DoubleEndedIterator<Item = A> + Clone,
{
    type Item = A;

    fn cursor(&self) -> Cursor<A> {
        Cursor::new(self.clone())
    }

    fn is_bidirectional(&self) -> bool {
        true
    }

    fn back_cursor(&self) -> Option<Cursor<A>> {
        Some(Cursor::new(self.clone().rev()))
    }
}

/// Forward-only sequence regenerated from a factory on every cursor.
struct FnSeq<F>(F);

impl<F, I> Sequence for FnSeq<F>
where
    F: Fn() -> I,
    I: IntoIterator,
    I::IntoIter: 'static,
{
    type Item = I::Item;

    fn cursor(&self) -> Cursor<I::Item> {
        Cursor::new((self.0)().into_iter())
    }
}

/// Cheap-to-clone handle on a sequence.
///
/// Clones share the same underlying operator application, and therefore the
/// same lazily built state. Not `Send`: one application is pulled from one
/// thread at a time.
pub struct LazySeq<T> {
    repr: Repr<T>,
}

enum Repr<T> {
    Empty,
    Shared(Rc<dyn Sequence<Item = T>>),
}

impl<T> LazySeq<T> {
    /// The always-empty sequence. Allocation free.
    pub const fn empty() -> Self {
        Self { repr: Repr::Empty }
    }

    pub fn is_empty_instance(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }
}

impl<T: 'static> LazySeq<T> {
    pub fn new<S>(seq: S) -> Self
    where
        S: Sequence<Item = T> + 'static,
    {
        Self {
            repr: Repr::Shared(Rc::new(seq)),
        }
    }

    /// Forward-only sequence whose cursors are produced by `factory`.
    pub fn from_fn<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::new(FnSeq(factory))
    }

    pub fn iter(&self) -> Cursor<T> {
        self.cursor()
    }

    /// Pull every element into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.cursor().collect()
    }
}

impl<T: Clone + 'static> LazySeq<T> {
    /// Backward-capable sequence over an owned buffer.
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            return Self::empty();
        }
        Self::new(Rc::<[T]>::from(items))
    }
}

impl<T: 'static> Sequence for LazySeq<T> {
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        match &self.repr {
            Repr::Empty => Cursor::empty(),
            Repr::Shared(seq) => seq.cursor(),
        }
    }

    fn is_bidirectional(&self) -> bool {
        match &self.repr {
            Repr::Empty => true,
            Repr::Shared(seq) => seq.is_bidirectional(),
        }
    }

    fn back_cursor(&self) -> Option<Cursor<T>> {
        match &self.repr {
            Repr::Empty => Some(Cursor::empty()),
            Repr::Shared(seq) => seq.back_cursor(),
        }
    }
}

impl<T> Clone for LazySeq<T> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Empty => Repr::Empty,
            Repr::Shared(seq) => Repr::Shared(Rc::clone(seq)),
        };
        Self { repr }
    }
}

impl<T> Default for LazySeq<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for LazySeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySeq")
            .field("empty_instance", &self.is_empty_instance())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> IntoIterator for LazySeq<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Cursor<T> {
        self.cursor()
    }
}

impl<T: 'static> IntoIterator for &LazySeq<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Cursor<T> {
        self.cursor()
    }
}

impl<T: Clone + 'static> FromIterator<T> for LazySeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Conversion into a [`LazySeq`], accepted wherever an operator takes a
/// secondary sequence.
pub trait IntoSeq {
    type Item;

    fn into_seq(self) -> LazySeq<Self::Item>;
}

impl<T: 'static> IntoSeq for LazySeq<T> {
    type Item = T;

    fn into_seq(self) -> LazySeq<T> {
        self
    }
}

impl<T: Clone + 'static> IntoSeq for Vec<T> {
    type Item = T;

    fn into_seq(self) -> LazySeq<T> {
        LazySeq::from_vec(self)
    }
}

impl<T: Clone + 'static, const N: usize> IntoSeq for [T; N] {
    type Item = T;

    fn into_seq(self) -> LazySeq<T> {
        LazySeq::from_vec(Vec::from(self))
    }
}

impl<T: Clone + 'static> IntoSeq for Rc<[T]> {
    type Item = T;

    fn into_seq(self) -> LazySeq<T> {
        LazySeq::new(self)
    }
}

impl<A> IntoSeq for Range<A>
where
    A: 'static,
    Range<A>: DoubleEndedIterator<Item = A> + Clone,
{
    type Item = A;

    fn into_seq(self) -> LazySeq<A> {
        LazySeq::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn buffer_sequence_iterates_both_ways() {
        let seq = LazySeq::from_vec(vec![1, 2, 3]);
        assert!(seq.is_bidirectional());
        assert_eq!(seq.to_vec(), vec![1, 2, 3]);
        let back: Vec<_> = seq.back_cursor().unwrap().collect();
        assert_eq!(back, vec![3, 2, 1]);
    }

    #[test]
    fn cursors_are_independent() {
        let seq: LazySeq<i32> = (0..4).into_seq();
        let mut a = seq.cursor();
        let mut b = seq.cursor();
        assert_eq!(a.next(), Some(0));
        assert_eq!(a.next(), Some(1));
        assert_eq!(b.next(), Some(0));
    }

    #[test]
    fn empty_instance_is_backward_capable() {
        let seq: LazySeq<String> = LazySeq::empty();
        assert!(seq.is_empty_instance());
        assert_eq!(seq.cursor().next(), None);
        assert_eq!(seq.back_cursor().unwrap().next(), None);
        assert!(LazySeq::<u8>::from_vec(Vec::new()).is_empty_instance());
    }

    #[test]
    fn generator_is_forward_only_and_lazy() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let seq = LazySeq::from_fn(move || {
            seen.set(seen.get() + 1);
            vec!["x", "y"]
        });
        assert_eq!(calls.get(), 0);
        assert!(!seq.is_bidirectional());
        assert!(seq.back_cursor().is_none());
        assert_eq!(seq.to_vec(), vec!["x", "y"]);
        assert_eq!(seq.to_vec(), vec!["x", "y"]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn collects_from_iterator() {
        let seq: LazySeq<char> = "abc".chars().collect();
        let out: String = seq.into_iter().collect();
        assert_eq!(out, "abc");
    }
}
