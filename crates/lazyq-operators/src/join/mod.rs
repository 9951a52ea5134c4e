//! Join family: `join`, `group_join`, `group_by`.
//!
//! All three index one side in a single pass on the first pull and then
//! resolve the other side against that index. A streaming join is not
//! attempted: one side always has to be materialized.

pub(crate) mod index;

pub mod group_by;
pub mod group_join;
pub mod inner;

pub use group_by::{
    group_by, group_by_and_fold, group_values_by, group_values_by_and_fold, GroupBy,
};
pub use group_join::{group_join, GroupJoin};
pub use inner::{join, Join};
