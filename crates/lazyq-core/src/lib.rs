#![forbid(unsafe_code)]
//! lazyq-core: shared kernel for the lazyq deferred query engine.
//!
//! This crate contains the *contracts* every operator consumes and produces:
//! the [`Sequence`](sequence::Sequence) trait, the type-erased
//! [`Cursor`](sequence::Cursor) and the cheaply clonable
//! [`LazySeq`](sequence::LazySeq) handle. There is **no I/O**, **no threads**
//! and **no async** here.
//!
//! Crates that use this:
//! - lazyq-operators: implements every operator descriptor and its cursors
//!   on top of `LazySeq`, and reports state builds through `metrics`.
//! - lazyq (root): re-exports both crates and hosts the end-to-end tests.

pub mod buffer;
pub mod config;
pub mod error;
pub mod id;
pub mod metrics;
pub mod prelude;
pub mod sequence;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
