//! Face classification models.
//!
//! A model composes a trainable projection strategy (plain
//! principal-component embedding for Eigenface, principal components
//! refined by a discriminant basis for Fisherface) with a shared
//! nearest-neighbor classifier over the projected training vectors.
//!
//! The strategy seam is a pair of traits: a [`ReductionLearner`] fits a
//! projection chain on a vectorized training batch, and the resulting
//! [`Projector`] maps individual vectors into the space queries are
//! answered in.
pub mod face;

use ndarray::prelude::*;

use crate::error::Result;

pub use self::face::{
    EigenfaceModel, FaceModel, FisherLearner, FisherProjector, FisherfaceModel, PcaLearner,
};

/// A fitted projection chain from a flattened image vector to the
/// low-dimensional space queries are answered in.
pub trait Projector {
    /// Output dimension of the projection.
    fn dim(&self) -> usize;

    /// Projects one row vector. Must be applied identically to training
    /// and query vectors.
    fn project(&self, row: &ArrayView1<f64>) -> Array1<f64>;
}

/// A trainable projection strategy.
///
/// Implementations fit a [`Projector`] on a vectorized training batch;
/// the two concrete strategies are [`PcaLearner`] (Eigenface) and
/// [`FisherLearner`] (Fisherface).
pub trait ReductionLearner {
    /// The fitted projection chain this strategy produces.
    type Fitted: Projector;

    /// Fits the projection chain.
    ///
    /// # Arguments
    ///
    /// * `x` - Vectorized training matrix, one image per row.
    /// * `labels` - One class label per row (ignored by unsupervised
    ///              strategies).
    /// * `components` - Requested principal-subspace dimension.
    fn fit(&self, x: &ArrayView2<f64>, labels: &[i32], components: usize)
        -> Result<Self::Fitted>;
}
