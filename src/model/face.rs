//! Eigenface and Fisherface models.
use itertools::Itertools;
use log::debug;
use ndarray::prelude::*;

use crate::error::{Error, Result};
use crate::image::{vectorize, Image};
use crate::knn::NearestNeighbor;
use crate::model::{Projector, ReductionLearner};
use crate::subspace::{DiscriminantReducer, PrincipalSubspace};

impl Projector for PrincipalSubspace {
    fn dim(&self) -> usize {
        PrincipalSubspace::dim(self)
    }

    fn project(&self, row: &ArrayView1<f64>) -> Array1<f64> {
        PrincipalSubspace::project(self, row)
    }
}

/// The Eigenface strategy: a plain principal-component embedding.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcaLearner;

impl ReductionLearner for PcaLearner {
    type Fitted = PrincipalSubspace;

    fn fit(&self, x: &ArrayView2<f64>, _labels: &[i32], components: usize)
            -> Result<PrincipalSubspace> {
        PrincipalSubspace::fit(x, components)
    }
}

/// A fitted Fisherface chain: principal components first, then the
/// discriminant basis on top.
#[derive(Debug, Clone)]
pub struct FisherProjector {
    pca: PrincipalSubspace,
    lda: DiscriminantReducer,
}

impl Projector for FisherProjector {
    fn dim(&self) -> usize {
        self.lda.dim()
    }

    fn project(&self, row: &ArrayView1<f64>) -> Array1<f64> {
        self.lda.project(&self.pca.project(row).view())
    }
}

/// The Fisherface strategy: principal components capped at `N - C`
/// dimensions, refined by a class-discriminant basis.
#[derive(Debug, Clone, Copy, Default)]
pub struct FisherLearner;

impl ReductionLearner for FisherLearner {
    type Fitted = FisherProjector;

    fn fit(&self, x: &ArrayView2<f64>, labels: &[i32], components: usize)
            -> Result<FisherProjector> {
        let n = x.nrows();
        let classes = labels.iter().unique().count();
        if n <= classes {
            return Err(Error::DegenerateInput(format!(
                "within-class scatter needs more samples than classes, \
                 got {} samples over {} classes",
                n, classes
            )));
        }

        // Cap the principal subspace at N - C dimensions before fitting
        // it, so the scatter matrices computed on top of it keep enough
        // rank for the pseudo-inverse solve.
        let capped = components.min(n - classes);
        debug!(
            "fisher reduction: {} samples, {} classes, principal request {} capped to {}",
            n, classes, components, capped
        );

        let pca = PrincipalSubspace::fit(x, capped)?;
        let projected = pca.project_batch(x);
        let lda = DiscriminantReducer::fit(&projected.view(), labels)?;

        Ok(FisherProjector { pca, lda })
    }
}

enum State<P> {
    Untrained,
    Trained(TrainedState<P>),
}

struct TrainedState<P> {
    projector: P,
    classifier: NearestNeighbor,
}

/// A face classifier over a fixed image geometry, generic in its
/// projection strategy.
///
/// `train()` builds the entire new model (projection chain plus reference
/// set) in private scratch state and publishes it with a single final
/// assignment: a caller never observes a basis from one training round
/// paired with references from another, and a failed `train()` leaves the
/// previously trained model fully usable.
///
/// Use the [`EigenfaceModel`] and [`FisherfaceModel`] aliases and their
/// `new()` constructors rather than naming the strategy types directly.
pub struct FaceModel<L: ReductionLearner> {
    width: usize,
    height: usize,
    components: usize,
    learner: L,
    state: State<L::Fitted>,
}

/// An Eigenface classifier: principal-component embedding plus
/// nearest-neighbor lookup.
pub type EigenfaceModel = FaceModel<PcaLearner>;

/// A Fisherface classifier: principal components refined by a
/// class-discriminant basis, plus nearest-neighbor lookup.
pub type FisherfaceModel = FaceModel<FisherLearner>;

impl EigenfaceModel {
    /// Constructs an untrained Eigenface model.
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Geometry every training and query image must
    ///                       have.
    /// * `components` - Requested principal-subspace dimension; the
    ///                  achieved dimension can be smaller (see
    ///                  [`projected_dim`]).
    ///
    /// [`projected_dim`]: FaceModel::projected_dim
    ///
    /// # Examples
    ///
    /// ```
    /// use facespace::image::Image;
    /// use facespace::model::EigenfaceModel;
    ///
    /// let images: Vec<Image> = [0., 10., 100., 110.]
    ///     .iter()
    ///     .map(|&v| Image::constant(2, 2, v))
    ///     .collect();
    ///
    /// let mut model = EigenfaceModel::new(2, 2, 1);
    /// model.train(&images, &[0, 0, 1, 1]).unwrap();
    ///
    /// assert_eq!(model.predict(&Image::constant(2, 2, 5.)).unwrap(), 0);
    /// assert_eq!(model.predict(&Image::constant(2, 2, 105.)).unwrap(), 1);
    /// ```
    pub fn new(width: usize, height: usize, components: usize) -> EigenfaceModel {
        FaceModel::with_learner(PcaLearner, width, height, components)
    }
}

impl FisherfaceModel {
    /// Constructs an untrained Fisherface model.
    ///
    /// Takes the same arguments as [`EigenfaceModel::new`]; the requested
    /// dimension is additionally capped at `N - C` during training, where
    /// `N` is the corpus size and `C` the number of distinct classes.
    pub fn new(width: usize, height: usize, components: usize) -> FisherfaceModel {
        FaceModel::with_learner(FisherLearner, width, height, components)
    }
}

impl<L: ReductionLearner> FaceModel<L> {
    /// Constructs an untrained model around an explicit strategy.
    pub fn with_learner(learner: L, width: usize, height: usize, components: usize)
            -> FaceModel<L> {
        FaceModel {
            width,
            height,
            components,
            learner,
            state: State::Untrained,
        }
    }

    /// Trains the model from scratch on a batch of images and labels.
    ///
    /// Any previously trained state is replaced atomically on success and
    /// kept untouched on failure.
    ///
    /// # Arguments
    ///
    /// * `images` - Single-channel images, all with this model's geometry.
    /// * `labels` - One opaque integer label per image, in matching order.
    pub fn train(&mut self, images: &[Image], labels: &[i32]) -> Result<()> {
        if images.len() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "{} images but {} labels",
                images.len(),
                labels.len()
            )));
        }
        if images.is_empty() {
            return Err(Error::DegenerateInput("empty training corpus".into()));
        }

        let x = self.vectorize_batch(images)?;
        let projector = self.learner.fit(&x.view(), labels, self.components)?;

        let mut references = Array2::zeros((x.nrows(), projector.dim()));
        for (i, row) in x.outer_iter().enumerate() {
            references.row_mut(i).assign(&projector.project(&row));
        }
        let classifier = NearestNeighbor::fit(references, labels.to_vec())?;

        debug!(
            "trained on {} images of {}x{}, projecting to {} dimensions",
            images.len(),
            self.width,
            self.height,
            projector.dim()
        );

        // Publish the complete new model in one step; every failure path
        // above returns before this line.
        self.state = State::Trained(TrainedState { projector, classifier });
        Ok(())
    }

    /// Predicts the label of one query image.
    ///
    /// Fails with [`Error::NotTrained`] before the first successful
    /// `train()`, and with [`Error::InvalidInput`] on an image whose
    /// geometry or channel count does not match the training corpus.
    pub fn predict(&self, image: &Image) -> Result<i32> {
        let trained = match &self.state {
            State::Trained(trained) => trained,
            State::Untrained => return Err(Error::NotTrained),
        };

        let row = self.vectorize_checked(image)?;
        let projected = trained.projector.project(&row.view());
        trained.classifier.predict(&projected.view())
    }

    /// Whether a successful `train()` has completed.
    pub fn is_trained(&self) -> bool {
        matches!(self.state, State::Trained(_))
    }

    /// Dimension of the space queries are answered in, once trained.
    pub fn projected_dim(&self) -> Option<usize> {
        match &self.state {
            State::Trained(trained) => Some(trained.projector.dim()),
            State::Untrained => None,
        }
    }

    /// Configured image width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Configured image height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Requested subspace dimension.
    pub fn components(&self) -> usize {
        self.components
    }

    fn vectorize_checked(&self, image: &Image) -> Result<Array1<f64>> {
        if image.width() != self.width || image.height() != self.height {
            return Err(Error::InvalidInput(format!(
                "expected a {}x{} image, got {}x{}",
                self.width,
                self.height,
                image.width(),
                image.height()
            )));
        }
        vectorize(image)
    }

    fn vectorize_batch(&self, images: &[Image]) -> Result<Array2<f64>> {
        let mut x = Array2::zeros((images.len(), self.width * self.height));
        for (i, image) in images.iter().enumerate() {
            let row = self.vectorize_checked(image)?;
            x.row_mut(i).assign(&row);
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<Image>, Vec<i32>) {
        let images = [10., 20., 30., 110., 120., 130.]
            .iter()
            .map(|&v| Image::constant(4, 4, v))
            .collect();
        (images, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn predict_before_train_fails() {
        let model = EigenfaceModel::new(4, 4, 2);
        let res = model.predict(&Image::constant(4, 4, 0.));
        assert!(matches!(res, Err(Error::NotTrained)));
    }

    #[test]
    fn mismatched_counts_fail_and_keep_previous_model() {
        let (images, labels) = corpus();
        let mut model = EigenfaceModel::new(4, 4, 2);
        model.train(&images, &labels).unwrap();

        let res = model.train(&images, &labels[..4]);
        assert!(matches!(res, Err(Error::InvalidInput(_))));

        // The earlier model still answers.
        assert!(model.is_trained());
        assert_eq!(model.predict(&Image::constant(4, 4, 15.)).unwrap(), 0);
    }

    #[test]
    fn empty_corpus_is_degenerate() {
        let mut model = EigenfaceModel::new(4, 4, 2);
        let res = model.train(&[], &[]);
        assert!(matches!(res, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn wrong_geometry_at_train_fails() {
        let mut model = EigenfaceModel::new(4, 4, 2);
        let images = vec![Image::constant(4, 4, 1.), Image::constant(2, 2, 2.)];
        let res = model.train(&images, &[0, 1]);
        assert!(matches!(res, Err(Error::InvalidInput(_))));
        assert!(!model.is_trained());
    }

    #[test]
    fn multichannel_query_fails() {
        let (images, labels) = corpus();
        let mut model = EigenfaceModel::new(4, 4, 2);
        model.train(&images, &labels).unwrap();

        let query = Image::new(4, 4, 3, vec![0.; 48]).unwrap();
        assert!(matches!(model.predict(&query), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn fisher_needs_more_samples_than_classes() {
        let images = vec![Image::constant(4, 4, 1.), Image::constant(4, 4, 2.)];
        let mut model = FisherfaceModel::new(4, 4, 2);
        let res = model.train(&images, &[0, 1]);
        assert!(matches!(res, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn fisher_single_class_is_degenerate() {
        let images = vec![
            Image::constant(4, 4, 1.),
            Image::constant(4, 4, 2.),
            Image::constant(4, 4, 3.),
        ];
        let mut model = FisherfaceModel::new(4, 4, 2);
        let res = model.train(&images, &[5, 5, 5]);
        assert!(matches!(res, Err(Error::DegenerateInput(_))));
    }

    /// The achieved dimension is readable back and reflects the data's
    /// rank, not the request.
    #[test]
    fn projected_dim_reports_achieved_dimension() {
        let (images, labels) = corpus();
        let mut model = EigenfaceModel::new(4, 4, 2);
        assert_eq!(model.projected_dim(), None);

        model.train(&images, &labels).unwrap();
        // Constant images span a single direction.
        assert_eq!(model.projected_dim(), Some(1));
    }
}
