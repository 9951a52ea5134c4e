//! Convenient re-exports for downstream crates.

pub use crate::buffer::BufferCursor;
pub use crate::config::QueryConfig;
pub use crate::error::{Error, Result};
pub use crate::id::StateId;
pub use crate::sequence::{Cursor, IntoSeq, LazySeq, Sequence};
