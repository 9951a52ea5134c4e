//! Cursors over shared, already-materialized buffers.

use std::iter::FusedIterator;
use std::rc::Rc;

/// Double-ended cursor over an `Rc<[T]>`. Elements are yielded by clone, so
/// the buffer lives exactly as long as its last cursor or owning sequence.
#[derive(Debug, Clone)]
pub struct BufferCursor<T> {
    buf: Rc<[T]>,
    front: usize,
    back: usize,
}

impl<T> BufferCursor<T> {
    pub fn new(buf: Rc<[T]>) -> Self {
        let back = buf.len();
        Self { buf, front: 0, back }
    }

    pub fn remaining(&self) -> usize {
        self.back - self.front
    }
}

impl<T: Clone> Iterator for BufferCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let item = self.buf[self.front].clone();
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }

    fn nth(&mut self, n: usize) -> Option<T> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<T: Clone> DoubleEndedIterator for BufferCursor<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.buf[self.back].clone())
    }
}

impl<T: Clone> ExactSizeIterator for BufferCursor<T> {}

impl<T: Clone> FusedIterator for BufferCursor<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meets_in_the_middle() {
        let mut cur = BufferCursor::new(Rc::from(vec![1, 2, 3, 4]));
        assert_eq!(cur.next(), Some(1));
        assert_eq!(cur.next_back(), Some(4));
        assert_eq!(cur.len(), 2);
        assert_eq!(cur.next_back(), Some(3));
        assert_eq!(cur.next(), Some(2));
        assert_eq!(cur.next(), None);
        assert_eq!(cur.next_back(), None);
    }

    #[test]
    fn nth_clamps_to_end() {
        let mut cur = BufferCursor::new(Rc::from(vec!['a', 'b', 'c']));
        assert_eq!(cur.nth(1), Some('b'));
        assert_eq!(cur.nth(10), None);
        assert_eq!(cur.remaining(), 0);
    }
}
