//! Strongly-typed identifiers used across the engine.
//!
//! Downstream crates should *not* use raw integers for IDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(StateId);

static NEXT_STATE_ID: AtomicU64 = AtomicU64::new(1);

impl StateId {
    /// Allocate a fresh id. One is taken per operator application.
    pub fn next() -> Self {
        Self(NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed))
    }
}
