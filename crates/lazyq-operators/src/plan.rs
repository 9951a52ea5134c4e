//! Operator planning surface: what an application precomputes.
//!
//! Every operator streams from live cursors unless it genuinely needs one side
//! materialized. The `Footprint` makes that choice inspectable.

use serde::{Deserialize, Serialize};

/// What an application builds in its shared state on first pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Materialization {
    /// Nothing; every element is streamed.
    Streaming,
    /// A single cached count (skip/take prefix bound).
    PrefixBound,
    /// The secondary sequence is buffered or indexed; the primary streams.
    SecondaryIndex,
    /// The whole primary sequence is buffered before the first element is yielded.
    FullSource,
}

/// Coarse memory model for one operator application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub materialization: Materialization,
    /// Whether each cursor keeps its own growing buffer (seen-set, pending queue).
    pub per_cursor_buffer: bool,
}

impl Footprint {
    pub const fn streaming() -> Self {
        Self::materializing(Materialization::Streaming)
    }

    pub const fn materializing(materialization: Materialization) -> Self {
        Self {
            materialization,
            per_cursor_buffer: false,
        }
    }

    pub const fn with_cursor_buffer(mut self) -> Self {
        self.per_cursor_buffer = true;
        self
    }

    /// Whether anything is built in shared state.
    pub const fn precomputes(&self) -> bool {
        !matches!(self.materialization, Materialization::Streaming)
    }
}
