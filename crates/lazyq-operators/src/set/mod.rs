//! Set algebra: `distinct`, `union_with`, `except`, `intersect`.
//!
//! `distinct` and `union_with` stream through a per-cursor seen-set.
//! `except` and `intersect` sort the secondary sequence once per application
//! and binary-search it for every primary element.

pub mod distinct;
pub mod membership;

pub use distinct::{distinct, union_with, Distinct, UnionWith};
pub use membership::{except, intersect, Except, Intersect};
