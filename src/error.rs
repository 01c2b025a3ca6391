//! Error taxonomy shared by all training and prediction routines.
//!
//! Every failure is detected synchronously and surfaced to the caller;
//! nothing is retried internally. A failing `train()` or `predict()` never
//! mutates previously published model state.
use thiserror::Error;

/// Errors returned by training and prediction routines.
#[derive(Debug, Error)]
pub enum Error {
    /// A shape, channel or count mismatch detected before any computation
    /// starts (e.g. a multi-channel image, or image/label counts that
    /// disagree).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A statistically ill-posed request: too few samples for a variance
    /// estimate, or too few classes to discriminate between.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The operation requires a prior successful `train()`.
    #[error("model has not been trained")]
    NotTrained,

    /// A query vector whose width does not match the trained projection.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A failure inside the linear-algebra backend (e.g. an eigensolver
    /// that did not converge). Rare; propagated verbatim.
    #[error(transparent)]
    Numerical(#[from] ndarray_linalg::error::LinalgError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
