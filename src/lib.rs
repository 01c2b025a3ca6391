//! The facespace crate.
//!
//! A crate implementing subspace-projection face recognition: models learn
//! a low-dimensional linear embedding from a corpus of labeled grayscale
//! face images and classify new images by nearest-neighbor lookup in that
//! embedding.
//!
//! Two variants are provided:
//!
//! * [`EigenfaceModel`](model::EigenfaceModel) embeds images into the top
//!   principal-component directions of pixel-intensity variance.
//! * [`FisherfaceModel`](model::FisherfaceModel) refines the
//!   principal-component embedding with a class-discriminant basis that
//!   maximizes between-class separation relative to within-class spread.
//!
//! # Goals
//! * Faithful batch train/predict behavior: one training call builds the
//!   whole model and publishes it atomically; prediction pushes a query
//!   through the identical transform chain.
//! * Honest numerics: Gram-matrix principal components, SVD-based
//!   pseudo-inverse for the routinely rank-deficient within-class scatter,
//!   a general eigensolver for the discriminant step.
//! * The caller owns image acquisition: models receive already-cropped,
//!   fixed-size, single-channel images and opaque integer labels, nothing
//!   else.
//!
//! # Examples
//!
//! Train a Fisherface model on a tiny two-class corpus and classify two
//! query images:
//!
//! ```
//! use facespace::image::Image;
//! use facespace::model::FisherfaceModel;
//!
//! let images: Vec<Image> = [10., 20., 30., 110., 120., 130.]
//!     .iter()
//!     .map(|&v| Image::constant(4, 4, v))
//!     .collect();
//! let labels = [0, 0, 0, 1, 1, 1];
//!
//! let mut model = FisherfaceModel::new(4, 4, 2);
//! model.train(&images, &labels).expect("Failed to train model");
//!
//! // Two classes leave exactly one discriminant direction.
//! assert_eq!(model.projected_dim(), Some(1));
//!
//! assert_eq!(model.predict(&Image::constant(4, 4, 15.)).unwrap(), 0);
//! assert_eq!(model.predict(&Image::constant(4, 4, 115.)).unwrap(), 1);
//! ```
//!
//! More examples on the individual pipeline stages at
//! [`PrincipalSubspace`](subspace::PrincipalSubspace),
//! [`DiscriminantReducer`](subspace::DiscriminantReducer) and
//! [`NearestNeighbor`](knn::NearestNeighbor).

pub mod error;
pub mod image;
pub mod knn;
pub mod model;
pub mod subspace;
