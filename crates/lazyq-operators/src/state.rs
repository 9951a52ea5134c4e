//! Shared operation state.
//!
//! One `SharedState` is created per operator application and held behind the
//! same `Rc` as the application's sources and closures. It stays empty until
//! the first pull of any cursor, is built exactly once, and is dropped when the
//! last cursor or sequence handle referencing it goes away.

use std::collections::BTreeMap;
use std::rc::Rc;

use lazyq_core::buffer::BufferCursor;
use lazyq_core::id::StateId;
use lazyq_core::metrics;
use once_cell::unsync::OnceCell;

/// Size reported to tracing when a state is built.
pub(crate) trait StateSize {
    fn rows(&self) -> usize;
}

impl<T> StateSize for Rc<[T]> {
    fn rows(&self) -> usize {
        self.len()
    }
}

impl<T> StateSize for Vec<T> {
    fn rows(&self) -> usize {
        self.len()
    }
}

impl StateSize for usize {
    fn rows(&self) -> usize {
        *self
    }
}

impl<K, V> StateSize for BTreeMap<K, V> {
    fn rows(&self) -> usize {
        self.len()
    }
}

pub(crate) struct SharedState<S> {
    op: &'static str,
    id: StateId,
    cell: OnceCell<S>,
}

impl<S: StateSize> SharedState<S> {
    pub(crate) fn new(op: &'static str) -> Self {
        Self {
            op,
            id: StateId::next(),
            cell: OnceCell::new(),
        }
    }

    pub(crate) fn get(&self) -> Option<&S> {
        self.cell.get()
    }

    pub(crate) fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Build on first call, then hand out the cached value.
    ///
    /// Panics if `build` re-enters the same state (a caller closure pulling
    /// from the sequence it is being evaluated for).
    pub(crate) fn get_or_build(&self, build: impl FnOnce() -> S) -> &S {
        self.cell.get_or_init(|| {
            let state = build();
            metrics::record_materialization(self.op, self.id, state.rows());
            state
        })
    }

    /// Store a value computed by a cursor as a side effect of its first pull.
    pub(crate) fn set(&self, state: S) -> &S {
        self.get_or_build(|| state)
    }
}

/// Cursor over a shared buffer that is only fetched on the first pull.
pub(crate) struct DeferredCursor<T, F> {
    fetch: F,
    buffer: Option<BufferCursor<T>>,
    backward: bool,
}

impl<T, F> DeferredCursor<T, F>
where
    F: Fn() -> Rc<[T]>,
{
    pub(crate) fn forward(fetch: F) -> Self {
        Self {
            fetch,
            buffer: None,
            backward: false,
        }
    }

    pub(crate) fn backward(fetch: F) -> Self {
        Self {
            fetch,
            buffer: None,
            backward: true,
        }
    }

    fn buffer(&mut self) -> &mut BufferCursor<T> {
        self.buffer
            .get_or_insert_with(|| BufferCursor::new((self.fetch)()))
    }
}

impl<T, F> Iterator for DeferredCursor<T, F>
where
    T: Clone,
    F: Fn() -> Rc<[T]>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let backward = self.backward;
        let buffer = self.buffer();
        if backward {
            buffer.next_back()
        } else {
            buffer.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.buffer {
            Some(buffer) => buffer.size_hint(),
            None => (0, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn builds_once() {
        let state: SharedState<Vec<u8>> = SharedState::new("test");
        let builds = Cell::new(0);
        assert!(!state.is_built());
        for _ in 0..3 {
            let v = state.get_or_build(|| {
                builds.set(builds.get() + 1);
                vec![1, 2]
            });
            assert_eq!(v.len(), 2);
        }
        assert_eq!(builds.get(), 1);
        assert!(state.get().is_some());
    }

    #[test]
    fn deferred_cursor_fetches_on_first_pull() {
        let fetched = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fetched);
        let mut cursor = DeferredCursor::backward(move || {
            flag.set(true);
            Rc::from(vec![1, 2, 3])
        });
        assert!(!fetched.get());
        assert_eq!(cursor.size_hint(), (0, None));
        assert_eq!(cursor.next(), Some(3));
        assert!(fetched.get());
        assert_eq!(cursor.size_hint(), (2, Some(2)));
    }
}
