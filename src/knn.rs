//! Nearest-neighbor classification over projected vectors.
use ndarray::prelude::*;

use crate::error::{Error, Result};

/// Returns the Euclidean distance between two vectors of f64 values.
fn euclidean_distance(v1: &ArrayView1<f64>, v2: &ArrayView1<f64>) -> f64 {
    v1.iter()
      .zip(v2.iter())
      .map(|(x, y)| (x - y).powi(2))
      .sum::<f64>()
      .sqrt()
}

/// A 1-nearest-neighbor classifier over a fixed reference set.
///
/// Stores the (projected vector, label) pairs produced by training verbatim;
/// a query is answered with the label of the closest reference under
/// Euclidean distance. A `NearestNeighbor` only exists in fitted form, so
/// there is no unfitted state to guard against at this level.
#[derive(Debug, Clone)]
pub struct NearestNeighbor {
    // One row per reference vector; labels[i] pairs with row i.
    references: Array2<f64>,
    labels: Vec<i32>,
}

impl NearestNeighbor {
    /// Stores the reference set. No computation happens here.
    ///
    /// # Arguments
    ///
    /// * `references` - Matrix with one projected training vector per row.
    /// * `labels` - One label per reference row, in matching order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use facespace::knn::NearestNeighbor;
    ///
    /// let references = array![[0., 0.],
    ///                         [1., 1.]];
    /// let knn = NearestNeighbor::fit(references, vec![3, 9]).unwrap();
    /// assert_eq!(knn.predict(&array![0.9, 0.9].view()).unwrap(), 9);
    /// ```
    pub fn fit(references: Array2<f64>, labels: Vec<i32>) -> Result<NearestNeighbor> {
        if references.nrows() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "{} reference vectors but {} labels",
                references.nrows(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(Error::DegenerateInput("empty reference set".into()));
        }
        Ok(NearestNeighbor { references, labels })
    }

    /// Returns the label of the reference closest to `query`.
    ///
    /// References are scanned in storage order and the incumbent is replaced
    /// only on a strictly smaller distance, so among exact ties the
    /// first-stored reference wins.
    ///
    /// Fails with [`Error::DimensionMismatch`] if the query width differs
    /// from the stored references' width.
    pub fn predict(&self, query: &ArrayView1<f64>) -> Result<i32> {
        if query.len() != self.references.ncols() {
            return Err(Error::DimensionMismatch {
                expected: self.references.ncols(),
                found: query.len(),
            });
        }

        let mut best = 0;
        let mut best_distance = euclidean_distance(&self.references.row(0), query);
        for (i, reference) in self.references.outer_iter().enumerate().skip(1) {
            let distance = euclidean_distance(&reference, query);
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }

        Ok(self.labels[best])
    }

    /// Number of stored references.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Width of the stored reference vectors.
    pub fn dim(&self) -> usize {
        self.references.ncols()
    }
}
