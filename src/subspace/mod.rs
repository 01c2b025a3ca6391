//! Linear subspace extraction.
//!
//! A [`PrincipalSubspace`] captures the directions of maximum variance of a
//! training matrix (the Eigenface embedding); a [`DiscriminantReducer`]
//! refines an already-projected matrix into the directions that best
//! separate classes (the Fisherface refinement). Both are fitted once from
//! a training batch and immutable afterward.
pub mod lda;
pub mod pca;

pub use self::lda::{DiscriminantReducer, DEFAULT_RCOND};
pub use self::pca::PrincipalSubspace;
