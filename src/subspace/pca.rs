//! Principal-component subspace extraction.
use log::debug;
use ndarray::prelude::*;
use ndarray_linalg::{Eigh, UPLO};

use crate::error::{Error, Result};

/// A fitted principal-component subspace: the training mean plus an
/// orthonormal basis of the top directions of variance.
///
/// The basis is computed from the eigendecomposition of the Gram matrix of
/// the centered training data (the "snapshot" method): with `N` training
/// rows of dimension `D`, the Gram matrix is `N x N`, which is the cheap
/// side for vectorized images where `N` is far smaller than `D = W * H`.
/// Each surviving Gram eigenvector maps back to a unit-norm direction in
/// data space.
///
/// The achieved dimension can be smaller than the requested one whenever
/// the data's numerical rank is smaller; read it back with [`dim()`]
/// rather than assuming the request was honored.
///
/// [`dim()`]: PrincipalSubspace::dim
#[derive(Debug, Clone)]
pub struct PrincipalSubspace {
    // Length-D centroid of the training rows.
    mean: Array1<f64>,
    // One orthonormal direction per row, decreasing explained variance.
    basis: Array2<f64>,
}

impl PrincipalSubspace {
    /// Fits the subspace on a training matrix with one sample per row.
    ///
    /// # Arguments
    ///
    /// * `x` - Training matrix, `N x D`, one sample per row.
    /// * `k` - Requested number of principal directions. The achieved
    ///         number is `min(k, rank)` and never exceeds `N - 1`.
    ///
    /// Fails with [`Error::DegenerateInput`] if `N < 2` (variance is
    /// undefined), `D < 1`, or `k < 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use facespace::subspace::PrincipalSubspace;
    ///
    /// // Three collinear points: a single direction explains everything.
    /// let x = array![[0., 0.],
    ///                [1., 0.],
    ///                [2., 0.]];
    /// let pca = PrincipalSubspace::fit(&x.view(), 2).unwrap();
    /// assert_eq!(pca.dim(), 1);
    ///
    /// let p = pca.project(&array![3., 0.].view());
    /// assert!((p[0].abs() - 2.).abs() < 1e-9);
    /// ```
    pub fn fit(x: &ArrayView2<f64>, k: usize) -> Result<PrincipalSubspace> {
        let n = x.nrows();
        let d = x.ncols();
        if n < 2 {
            return Err(Error::DegenerateInput(format!(
                "principal subspace needs at least 2 samples, got {}",
                n
            )));
        }
        if d < 1 {
            return Err(Error::DegenerateInput("samples have dimension 0".into()));
        }
        if k < 1 {
            return Err(Error::DegenerateInput("requested subspace dimension is 0".into()));
        }

        let mean = x.mean_axis(Axis(0))
                    .expect("Unexpected empty axis in mean computation");
        let centered = x.to_owned() - &mean;

        // Eigendecomposition of the N x N Gram matrix; eigenvalues come
        // back in ascending order.
        let gram = centered.dot(&centered.t());
        let (eigenvalues, eigenvectors) = gram.eigh(UPLO::Upper)?;

        // Eigenvalues at numerical-noise level do not correspond to real
        // variance directions; everything below this threshold is rank
        // deficiency introduced by centering or duplicate samples.
        let largest = eigenvalues[n - 1].max(0.);
        let threshold = largest * n as f64 * f64::EPSILON;

        let requested = k.min(n - 1);
        let mut rows: Vec<Array1<f64>> = Vec::with_capacity(requested);
        for i in (0..n).rev() {
            if rows.len() == requested {
                break;
            }
            let lambda = eigenvalues[i];
            if lambda <= threshold {
                // Ascending order: everything further down is smaller.
                break;
            }
            // Map the Gram eigenvector back to data space; the result has
            // norm sqrt(lambda), so dividing normalizes it.
            let direction = centered.t().dot(&eigenvectors.column(i)) / lambda.sqrt();
            rows.push(direction);
        }

        let mut basis = Array2::zeros((rows.len(), d));
        for (i, row) in rows.iter().enumerate() {
            basis.row_mut(i).assign(row);
        }

        debug!(
            "fitted principal subspace: {} samples of dimension {}, {} of {} requested directions",
            n,
            d,
            basis.nrows(),
            k
        );

        Ok(PrincipalSubspace { mean, basis })
    }

    /// Achieved subspace dimension.
    pub fn dim(&self) -> usize {
        self.basis.nrows()
    }

    /// The training mean.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// The orthonormal basis, one direction per row, decreasing explained
    /// variance.
    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    /// Projects a row vector into the subspace: `(row - mean) . basis^T`.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have the fitted data dimension `D`.
    pub fn project(&self, row: &ArrayView1<f64>) -> Array1<f64> {
        (row - &self.mean).dot(&self.basis.t())
    }

    /// Projects every row of a matrix into the subspace.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have the fitted data dimension `D` columns.
    pub fn project_batch(&self, x: &ArrayView2<f64>) -> Array2<f64> {
        (x.to_owned() - &self.mean).dot(&self.basis.t())
    }
}
