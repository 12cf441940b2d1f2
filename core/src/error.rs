//! Error types for the search core.

use thiserror::Error;

/// Errors surfaced while constructing indexes and engines.
///
/// Query evaluation never fails: unknown terms are dropped and degenerate
/// arithmetic collapses to zero.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Champion lists must keep at least one posting.
    #[error("invalid champion threshold {0}: must be greater than 0")]
    InvalidChampionThreshold(usize),

    /// BM25 term-frequency saturation must be finite and non-negative.
    #[error("invalid BM25 k {0}: must be >= 0")]
    InvalidBm25K(f64),

    /// BM25 length normalization must lie in [0, 1].
    #[error("invalid BM25 b {0}: must lie in [0, 1]")]
    InvalidBm25B(f64),

    /// A ranked index cannot be built over zero documents.
    #[error("corpus is empty")]
    EmptyCorpus,

    /// More documents than a [`DocId`](crate::DocId) can address.
    #[error("corpus of {0} documents exceeds the document id range")]
    CorpusTooLarge(usize),
}

/// Result type for search core operations.
pub type Result<T> = std::result::Result<T, Error>;
