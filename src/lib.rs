#![forbid(unsafe_code)]
//! lazyq: deferred, pull-driven query operators over lazy sequences.
//!
//! This crate only stitches the workspace together:
//! - `lazyq_core`: the sequence contract, errors and configuration.
//! - `lazyq_operators`: every operator descriptor.
//! - [`prelude`]: both, flattened.
//!
//! ```
//! use lazyq::prelude::*;
//!
//! let evens = vec![3, 1, 4, 1, 5, 9, 2, 6]
//!     .apply(where_(|x: &i32| x % 2 == 0))
//!     .apply(order_by(|x: &i32| *x));
//! assert_eq!(evens.to_vec(), vec![2, 4, 6]);
//! assert_eq!(last(&evens), Ok(6));
//! ```

pub use lazyq_core;
pub use lazyq_operators;

pub mod prelude {
    pub use lazyq_core::prelude::*;
    pub use lazyq_operators::*;
}
