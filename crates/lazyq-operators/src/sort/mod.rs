//! Sorting: `order_by` / `then_by` and the comparator chain behind them.

pub mod comparator;
pub mod order_by;

pub use comparator::{Comparator, Direction, KeyComparator, TieBreak};
pub use order_by::{order_by, order_by_descending, order_by_using, OrderBy, OrderedSeq};
