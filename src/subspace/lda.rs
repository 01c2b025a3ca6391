//! Linear-discriminant refinement of an already-reduced training matrix.
use std::cmp::Reverse;

use log::debug;
use ndarray::prelude::*;
use ndarray_linalg::{Eig, SVD};
use ordered_float::OrderedFloat;

use crate::error::{Error, Result};

/// Relative singular-value cutoff used when pseudo-inverting the
/// within-class scatter matrix. Singular values below
/// `DEFAULT_RCOND * sigma_max` are treated as zero instead of inverted.
///
/// The within-class scatter is routinely rank-deficient when per-class
/// sample counts are small relative to the input dimension, so this is a
/// load-bearing tunable, not a safety net; override it with
/// [`DiscriminantReducer::fit_with_rcond`] if a corpus needs it.
pub const DEFAULT_RCOND: f64 = 1e-12;

/// SVD-based pseudo-inverse; singular values at or below
/// `rcond * sigma_max` are zeroed rather than inverted.
fn pseudo_inverse(m: &Array2<f64>, rcond: f64) -> Result<Array2<f64>> {
    let (u, sigma, vt) = m.svd(true, true)?;
    let u = u.expect("Unexpected missing U factor");
    let vt = vt.expect("Unexpected missing V^T factor");

    let cutoff = rcond * sigma.iter().cloned().fold(0., f64::max);
    let mut v = vt.t().to_owned();
    for (j, &s) in sigma.iter().enumerate() {
        let factor = if s > cutoff { 1. / s } else { 0. };
        v.column_mut(j).mapv_inplace(|value| value * factor);
    }

    Ok(v.dot(&u.t()))
}

/// Outer product `v^T v` of a row vector with itself.
fn outer(v: &Array1<f64>) -> Array2<f64> {
    let column = v.view().insert_axis(Axis(1));
    let row = v.view().insert_axis(Axis(0));
    column.dot(&row)
}

/// A fitted linear-discriminant basis: the directions that maximize
/// between-class separation relative to within-class spread.
///
/// Fitting solves the eigenproblem of `pinv(Sw) . Sb`, where `Sw` and `Sb`
/// are the within- and between-class scatter matrices of the input rows.
/// That product is in general not symmetric, so a general eigensolver is
/// used; its eigenpairs can be complex in principle. The dominant
/// eigenvalues of this positive-semidefinite product are real up to
/// numerical noise, so the real parts are kept for both the ordering and
/// the basis.
#[derive(Debug, Clone)]
pub struct DiscriminantReducer {
    // (C - 1) rows of length k, descending eigenvalue.
    basis: Array2<f64>,
}

impl DiscriminantReducer {
    /// Fits the discriminant basis with the default pseudo-inverse cutoff.
    ///
    /// # Arguments
    ///
    /// * `xp` - Training matrix after principal-component projection,
    ///          one sample per row.
    /// * `labels` - One class label per row, in matching order. Labels are
    ///              opaque; only equality matters.
    ///
    /// Fails with [`Error::DegenerateInput`] if fewer than 2 distinct
    /// classes are present, and with [`Error::InvalidInput`] if the label
    /// count does not match the row count.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use facespace::subspace::DiscriminantReducer;
    ///
    /// let xp = array![[0., 0.],
    ///                 [1., 1.],
    ///                 [4., 0.],
    ///                 [5., 1.]];
    /// let lda = DiscriminantReducer::fit(&xp.view(), &[0, 0, 1, 1]).unwrap();
    /// // Two classes give a single discriminant direction.
    /// assert_eq!(lda.dim(), 1);
    /// ```
    pub fn fit(xp: &ArrayView2<f64>, labels: &[i32]) -> Result<DiscriminantReducer> {
        DiscriminantReducer::fit_with_rcond(xp, labels, DEFAULT_RCOND)
    }

    /// Same as [`fit`], with an explicit pseudo-inverse cutoff.
    ///
    /// [`fit`]: DiscriminantReducer::fit
    pub fn fit_with_rcond(
        xp: &ArrayView2<f64>,
        labels: &[i32],
        rcond: f64,
    ) -> Result<DiscriminantReducer> {
        let n = xp.nrows();
        let k = xp.ncols();
        if labels.len() != n {
            return Err(Error::InvalidInput(format!(
                "{} samples but {} labels",
                n,
                labels.len()
            )));
        }
        if k < 1 {
            return Err(Error::DegenerateInput(
                "projected training matrix has dimension 0".into(),
            ));
        }

        // Group row indices by label, keeping first-occurrence order so
        // that the floating-point accumulation below is deterministic.
        let mut groups: Vec<(i32, Vec<usize>)> = Vec::new();
        for (i, &label) in labels.iter().enumerate() {
            match groups.iter_mut().find(|(l, _)| *l == label) {
                Some((_, members)) => members.push(i),
                None => groups.push((label, vec![i])),
            }
        }
        let c = groups.len();
        if c < 2 {
            return Err(Error::DegenerateInput(format!(
                "discriminant analysis needs at least 2 classes, got {}",
                c
            )));
        }

        let overall = xp.mean_axis(Axis(0))
                        .expect("Unexpected empty axis in mean computation");

        let mut sw = Array2::<f64>::zeros((k, k));
        let mut sb = Array2::<f64>::zeros((k, k));
        for (_, members) in &groups {
            let mut group_mean = Array1::<f64>::zeros(k);
            for &i in members {
                group_mean += &xp.row(i);
            }
            group_mean /= members.len() as f64;

            // Sb += |group| * (m_c - m)^T (m_c - m)
            let diff = &group_mean - &overall;
            sb.scaled_add(members.len() as f64, &outer(&diff));

            // Sw += sum over the group of (x - m_c)^T (x - m_c)
            for &i in members {
                let dev = xp.row(i).to_owned() - &group_mean;
                sw += &outer(&dev);
            }
        }

        let sw_pinv = pseudo_inverse(&sw, rcond)?;
        let separability = sw_pinv.dot(&sb);
        let (eigenvalues, eigenvectors) = separability.eig()?;

        let mut order: Vec<usize> = (0..eigenvalues.len()).collect();
        order.sort_by_key(|&i| Reverse(OrderedFloat(eigenvalues[i].re)));

        let kept = (c - 1).min(k);
        if kept < c - 1 {
            debug!(
                "discriminant basis truncated to {} directions ({} classes in dimension {})",
                kept, c, k
            );
        }

        let mut basis = Array2::zeros((kept, k));
        for (row, &i) in order.iter().take(kept).enumerate() {
            for (col, value) in eigenvectors.column(i).iter().enumerate() {
                basis[[row, col]] = value.re;
            }
        }

        debug!(
            "fitted discriminant basis: {} classes, {} -> {} dimensions",
            c, k, kept
        );

        Ok(DiscriminantReducer { basis })
    }

    /// Achieved number of discriminant directions (`C - 1` classes worth).
    pub fn dim(&self) -> usize {
        self.basis.nrows()
    }

    /// The discriminant basis, one direction per row, descending
    /// eigenvalue.
    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    /// Projects an already-PCA-projected row: `xp . basis^T`.
    ///
    /// # Panics
    ///
    /// Panics if `xp` does not have the fitted input dimension.
    pub fn project(&self, xp: &ArrayView1<f64>) -> Array1<f64> {
        xp.dot(&self.basis.t())
    }
}
