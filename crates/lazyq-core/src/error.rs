use thiserror::Error;

/// Canonical result for core and operators.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An accessor was invoked on a sequence with zero elements.
    #[error("sequence contains no elements")]
    EmptySequence,

    /// A predicate-constrained accessor found no match in a non-empty sequence.
    #[error("no element satisfies the predicate")]
    OutOfRange,

    #[error("Invalid configuration: {0}")]
    Config(String),
}
