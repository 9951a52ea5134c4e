//! Projection operators: `select` and `select_many`.

use std::collections::VecDeque;
use std::rc::Rc;

use lazyq_core::sequence::{Cursor, LazySeq, Sequence};

use crate::plan::Footprint;
use crate::traits::{Indexless, Operator, Selector};

/// Maps every element through a selector.
pub struct Select<S> {
    sel: S,
}

pub fn select<T, U, F>(sel: F) -> Select<Indexless<F>>
where
    F: Fn(&T) -> U,
{
    Select {
        sel: Indexless(sel),
    }
}

pub fn select_with_index<T, U, F>(sel: F) -> Select<F>
where
    F: Fn(&T, usize) -> U,
{
    Select { sel }
}

impl<T, S> Operator<T> for Select<S>
where
    T: 'static,
    S: Selector<T> + 'static,
    S::Output: 'static,
{
    type Output = LazySeq<S::Output>;

    fn name(&self) -> &'static str {
        "select"
    }

    fn footprint(&self) -> Footprint {
        Footprint::streaming()
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<S::Output> {
        LazySeq::new(SelectSeq(Rc::new(SelectState {
            source,
            sel: self.sel,
        })))
    }
}

struct SelectState<T, S> {
    source: LazySeq<T>,
    sel: S,
}

struct SelectSeq<T, S>(Rc<SelectState<T, S>>);

impl<T, S> Sequence for SelectSeq<T, S>
where
    T: 'static,
    S: Selector<T> + 'static,
    S::Output: 'static,
{
    type Item = S::Output;

    fn cursor(&self) -> Cursor<S::Output> {
        Cursor::new(SelectCursor {
            upstream: self.0.source.cursor(),
            state: Rc::clone(&self.0),
            index: 0,
        })
    }
}

struct SelectCursor<T, S> {
    state: Rc<SelectState<T, S>>,
    upstream: Cursor<T>,
    index: usize,
}

impl<T, S: Selector<T>> Iterator for SelectCursor<T, S> {
    type Item = S::Output;

    fn next(&mut self) -> Option<S::Output> {
        let item = self.upstream.next()?;
        let out = self.state.sel.select(&item, self.index);
        self.index += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

/// Maps every element to a sub-sequence and flattens the results.
pub struct SelectMany<S> {
    sel: S,
}

pub fn select_many<T, I, F>(sel: F) -> SelectMany<Indexless<F>>
where
    F: Fn(&T) -> I,
    I: IntoIterator,
{
    SelectMany {
        sel: Indexless(sel),
    }
}

pub fn select_many_with_index<T, I, F>(sel: F) -> SelectMany<F>
where
    F: Fn(&T, usize) -> I,
    I: IntoIterator,
{
    SelectMany { sel }
}

impl<T, S> Operator<T> for SelectMany<S>
where
    T: 'static,
    S: Selector<T> + 'static,
    S::Output: IntoIterator,
    <S::Output as IntoIterator>::Item: 'static,
{
    type Output = LazySeq<<S::Output as IntoIterator>::Item>;

    fn name(&self) -> &'static str {
        "select_many"
    }

    fn footprint(&self) -> Footprint {
        Footprint::streaming().with_cursor_buffer()
    }

    fn apply(self, source: LazySeq<T>) -> Self::Output {
        LazySeq::new(SelectManySeq(Rc::new(SelectState {
            source,
            sel: self.sel,
        })))
    }
}

struct SelectManySeq<T, S>(Rc<SelectState<T, S>>);

impl<T, S> Sequence for SelectManySeq<T, S>
where
    T: 'static,
    S: Selector<T> + 'static,
    S::Output: IntoIterator,
    <S::Output as IntoIterator>::Item: 'static,
{
    type Item = <S::Output as IntoIterator>::Item;

    fn cursor(&self) -> Cursor<Self::Item> {
        Cursor::new(SelectManyCursor {
            upstream: self.0.source.cursor(),
            state: Rc::clone(&self.0),
            index: 0,
            pending: VecDeque::new(),
        })
    }
}

struct SelectManyCursor<T, S>
where
    S: Selector<T>,
    S::Output: IntoIterator,
{
    state: Rc<SelectState<T, S>>,
    upstream: Cursor<T>,
    index: usize,
    pending: VecDeque<<S::Output as IntoIterator>::Item>,
}

impl<T, S> Iterator for SelectManyCursor<T, S>
where
    S: Selector<T>,
    S::Output: IntoIterator,
{
    type Item = <S::Output as IntoIterator>::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }
            // Refill only once the queue is drained.
            let source = self.upstream.next()?;
            self.pending
                .extend(self.state.sel.select(&source, self.index));
            self.index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ApplyExt;
    use std::cell::Cell;

    #[test]
    fn select_maps_with_and_without_index() {
        let words = vec!["a", "bb", "ccc"];
        let lens = words.clone().apply(select(|w: &&str| w.len()));
        assert_eq!(lens.to_vec(), vec![1, 2, 3]);
        let tagged = words.apply(select_with_index(|w: &&str, i| format!("{i}:{w}")));
        assert_eq!(tagged.to_vec(), vec!["0:a", "1:bb", "2:ccc"]);
    }

    #[test]
    fn select_many_flattens_in_order() {
        let out = vec![1, 0, 3]
            .apply(select_many(|n: &usize| vec![*n; *n]))
            .to_vec();
        assert_eq!(out, vec![1, 3, 3, 3]);
        let out = vec!["ab", "c"]
            .apply(select_many_with_index(|s: &&str, i| {
                s.chars().map(move |c| (i, c)).collect::<Vec<_>>()
            }))
            .to_vec();
        assert_eq!(out, vec![(0, 'a'), (0, 'b'), (1, 'c')]);
    }

    #[test]
    fn select_many_pulls_upstream_only_when_drained() {
        let pulls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulls);
        let flat = LazySeq::from_fn(move || {
            let counter = Rc::clone(&counter);
            (0..3).inspect(move |_| counter.set(counter.get() + 1))
        })
        .apply(select_many(|n: &i32| vec![*n, *n]));
        let mut cursor = flat.cursor();
        assert_eq!(cursor.next(), Some(0));
        assert_eq!(cursor.next(), Some(0));
        assert_eq!(pulls.get(), 1);
        assert_eq!(cursor.next(), Some(1));
        assert_eq!(pulls.get(), 2);
    }
}
