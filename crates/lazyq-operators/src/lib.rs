#![forbid(unsafe_code)]
//! lazyq-operators: deferred operators over `LazySeq`
//! (filter/project/set-algebra/sort/join/group/concat/zip/reverse).
//!
//! Design intent:
//! - Keep this crate pure, synchronous and single-threaded.
//! - Constructing a descriptor or applying it never pulls; only cursors do.
//! - Anything an operator cannot stream (sorted buffers, key indices, group
//!   results) lives in a per-application shared state, built once on the first
//!   pull of any cursor and released with the last cursor.
//! - Each descriptor exposes a `Footprint` describing what it precomputes.

pub mod plan;
pub mod traits;

pub mod order;
pub(crate) mod state;

pub mod filter;
pub mod map;

pub mod combine;
pub mod join;
pub mod positional;
pub mod set;
pub mod sort;

pub use plan::{Footprint, Materialization};
pub use traits::{ApplyExt, FirstN, IndexedPredicate, Indexless, Operator, Selector};

pub use combine::{concat, zip};
pub use filter::{
    skip, skip_while, skip_while_with_index, take, take_while, take_while_with_index, where_,
    where_with_index,
};
pub use join::{
    group_by, group_by_and_fold, group_join, group_values_by, group_values_by_and_fold, join,
};
pub use map::{select, select_many, select_many_with_index, select_with_index};
pub use order::{KeyOrder, NaturalOrder};
pub use positional::{last, last_if, last_or_default, last_or_default_if, reverse};
pub use set::{distinct, except, intersect, union_with};
pub use sort::{order_by, order_by_descending, order_by_using, OrderedSeq};
