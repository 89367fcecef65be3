//! Typed errors for the stampifier library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell
//! contract violations apart from loading failures.

use thiserror::Error;

use crate::matching::stable::PreferenceSide;

/// Errors that can occur while matching, covering or picking stamp pages.
///
/// Degenerate input (no candidates, a zero page cap, no summary sentences)
/// is never an error; those calls return an empty selection instead.
#[derive(Debug, Error)]
pub enum StampError {
    /// Preference matrices are not square or disagree on their size
    #[error("preference matrix must be {expected}x{expected}, found a dimension of {actual}")]
    PreferenceMatrixShape { expected: usize, actual: usize },

    /// A preference row is not a permutation of `0..N`
    #[error("{side} preference row {row} is not a permutation of the other side's indices")]
    InvalidPreferenceRow { side: PreferenceSide, row: usize },

    /// Equal-size matcher called without running the preprocessor first
    #[error("input sizes do not match for text media matching: {sentences} sentences, {media} media")]
    UnequalMatchingInput { sentences: usize, media: usize },

    /// Capping method selector not recognised
    #[error("unknown capping method: {0}")]
    UnknownCappingMethod(String),

    /// A cover was built over a different number of summary sentences
    #[error("cover has {actual} elements but this cover set is over {expected}")]
    CoverLengthMismatch { expected: usize, actual: usize },

    /// Cover costs must be finite and positive
    #[error("cover {id} has invalid cost {cost}")]
    InvalidCoverCost { id: usize, cost: f32 },

    /// Seed subset size outside the supported range
    #[error("seed subset size must be between 1 and {max}, found {actual}")]
    InvalidSeedSubsetSize { actual: usize, max: usize },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while loading descriptor embeddings
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for stampifier operations.
pub type Result<T> = std::result::Result<T, StampError>;
