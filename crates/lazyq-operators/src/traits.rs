//! Operator trait + common caller-closure interfaces.
//!
//! A descriptor captures an operator's parameters. `apply` consumes it, so a
//! descriptor can never be applied twice; the output is a fresh application
//! with its own, independent shared state.

use lazyq_core::sequence::{IntoSeq, LazySeq};

use crate::plan::Footprint;

/// Trait that all operator descriptors implement.
///
/// Invariants:
/// - `apply` is cheap and side-effect free: no element is pulled and no
///   caller closure runs until a cursor of the output is pulled.
/// - Descriptors are move-only; they are not `Clone`.
///
/// Applying the same descriptor twice does not compile:
///
/// ```compile_fail
/// use lazyq_operators::{take, ApplyExt};
///
/// let op = take(2);
/// let a = vec![1, 2, 3].apply(op);
/// let b = vec![4, 5, 6].apply(op);
/// ```
pub trait Operator<T> {
    type Output;

    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// What this operator precomputes once per application.
    fn footprint(&self) -> Footprint;

    /// Bind the descriptor to its primary sequence.
    fn apply(self, source: LazySeq<T>) -> Self::Output;
}

/// `seq.apply(op)` for anything convertible into a `LazySeq`.
pub trait ApplyExt: IntoSeq + Sized {
    fn apply<O>(self, op: O) -> O::Output
    where
        O: Operator<Self::Item>,
    {
        Operator::apply(op, self.into_seq())
    }
}

impl<S: IntoSeq> ApplyExt for S {}

/// Predicate over an element and its zero-based position in the upstream sequence.
pub trait IndexedPredicate<T> {
    fn test(&self, item: &T, index: usize) -> bool;
}

impl<T, F> IndexedPredicate<T> for F
where
    F: Fn(&T, usize) -> bool,
{
    fn test(&self, item: &T, index: usize) -> bool {
        self(item, index)
    }
}

/// Adapts a closure that ignores the element index.
#[derive(Debug, Clone, Copy)]
pub struct Indexless<F>(pub F);

impl<T, F> IndexedPredicate<T> for Indexless<F>
where
    F: Fn(&T) -> bool,
{
    fn test(&self, item: &T, _index: usize) -> bool {
        (self.0)(item)
    }
}

/// Holds for the first `n` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstN(pub usize);

impl<T> IndexedPredicate<T> for FirstN {
    fn test(&self, _item: &T, index: usize) -> bool {
        index < self.0
    }
}

/// Projection of an element and its position.
pub trait Selector<T> {
    type Output;

    fn select(&self, item: &T, index: usize) -> Self::Output;
}

impl<T, U, F> Selector<T> for F
where
    F: Fn(&T, usize) -> U,
{
    type Output = U;

    fn select(&self, item: &T, index: usize) -> U {
        self(item, index)
    }
}

impl<T, U, F> Selector<T> for Indexless<F>
where
    F: Fn(&T) -> U,
{
    type Output = U;

    fn select(&self, item: &T, _index: usize) -> U {
        (self.0)(item)
    }
}
