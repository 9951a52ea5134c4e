//! Positional accessors (`last*`) and `reverse`.
//!
//! Both pick their algorithm from the source's capabilities. A backward
//! capable source is searched or walked from its end directly. Anything else
//! gets the forward fallback: one scan remembering the latest match for
//! `last*`, one buffered copy for `reverse`.

use std::rc::Rc;

use lazyq_core::buffer::BufferCursor;
use lazyq_core::config::QueryConfig;
use lazyq_core::error::{Error, Result};
use lazyq_core::sequence::{Cursor, LazySeq, Sequence};

use crate::plan::{Footprint, Materialization};
use crate::state::SharedState;
use crate::traits::Operator;

fn backward_cursor<S: Sequence + ?Sized>(seq: &S) -> Option<Cursor<S::Item>> {
    if QueryConfig::current().backward_paths && seq.is_bidirectional() {
        seq.back_cursor()
    } else {
        None
    }
}

/// The last element.
///
/// Fails with [`Error::EmptySequence`] when `seq` has no elements.
pub fn last<S: Sequence + ?Sized>(seq: &S) -> Result<S::Item> {
    last_if(seq, |_: &S::Item| true)
}

/// The last element satisfying `pred`.
///
/// Fails with [`Error::EmptySequence`] when `seq` has no elements, and with
/// [`Error::OutOfRange`] when none of them satisfies `pred`.
pub fn last_if<S, F>(seq: &S, pred: F) -> Result<S::Item>
where
    S: Sequence + ?Sized,
    F: Fn(&S::Item) -> bool,
{
    let mut seen_any = false;
    if let Some(back) = backward_cursor(seq) {
        for item in back {
            seen_any = true;
            if pred(&item) {
                return Ok(item);
            }
        }
    } else {
        let mut found = None;
        for item in seq.cursor() {
            seen_any = true;
            if pred(&item) {
                found = Some(item);
            }
        }
        if let Some(item) = found {
            return Ok(item);
        }
    }
    Err(if seen_any {
        Error::OutOfRange
    } else {
        Error::EmptySequence
    })
}

pub fn last_or_default<S>(seq: &S) -> S::Item
where
    S: Sequence + ?Sized,
    S::Item: Default,
{
    last(seq).unwrap_or_default()
}

/// Like [`last_if`], returning the default value instead of failing.
pub fn last_or_default_if<S, F>(seq: &S, pred: F) -> S::Item
where
    S: Sequence + ?Sized,
    S::Item: Default,
    F: Fn(&S::Item) -> bool,
{
    last_if(seq, pred).unwrap_or_default()
}

/// Elements in reverse order. The result is always backward capable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reverse;

pub fn reverse() -> Reverse {
    Reverse
}

impl<T: Clone + 'static> Operator<T> for Reverse {
    type Output = LazySeq<T>;

    fn name(&self) -> &'static str {
        "reverse"
    }

    /// Worst case: sources without backward traversal are buffered whole.
    fn footprint(&self) -> Footprint {
        Footprint::materializing(Materialization::FullSource)
    }

    fn apply(self, source: LazySeq<T>) -> LazySeq<T> {
        LazySeq::new(ReverseSeq(Rc::new(ReverseState {
            source,
            reversed: SharedState::new("reverse"),
        })))
    }
}

struct ReverseState<T> {
    source: LazySeq<T>,
    reversed: SharedState<Rc<[T]>>,
}

impl<T: Clone + 'static> ReverseState<T> {
    /// Walk the source from its end when it allows it, otherwise stream the
    /// reversed copy built once per application.
    fn open(&self) -> Cursor<T> {
        if let Some(back) = backward_cursor(&self.source) {
            return back;
        }
        let reversed = self.reversed.get_or_build(|| {
            let mut rows: Vec<T> = self.source.cursor().collect();
            rows.reverse();
            Rc::from(rows)
        });
        Cursor::new(BufferCursor::new(Rc::clone(reversed)))
    }
}

/// Always backward capable: its back cursor is the source's forward cursor.
struct ReverseSeq<T>(Rc<ReverseState<T>>);

impl<T: Clone + 'static> Sequence for ReverseSeq<T> {
    type Item = T;

    fn cursor(&self) -> Cursor<T> {
        Cursor::new(ReverseCursor {
            state: Rc::clone(&self.0),
            inner: None,
        })
    }

    fn is_bidirectional(&self) -> bool {
        true
    }

    fn back_cursor(&self) -> Option<Cursor<T>> {
        Some(self.0.source.cursor())
    }
}

/// Picks its traversal on the first pull, so neither applying `reverse` nor
/// creating a cursor reads the configuration.
struct ReverseCursor<T> {
    state: Rc<ReverseState<T>>,
    inner: Option<Cursor<T>>,
}

impl<T: Clone + 'static> Iterator for ReverseCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let state = &self.state;
        self.inner.get_or_insert_with(|| state.open()).next()
    }
}
