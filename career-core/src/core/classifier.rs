//! Classifier contract
//!
//! The pipeline only needs `fit(X, y)` and `predict(x)`; any model behind
//! this trait can be trained and served by the same orchestration code.

use crate::error::Result;

/// Multi-class classifier over dense, already-scaled feature vectors.
pub trait Classifier: Send + Sync {
    /// Fit on a row-major matrix with labels in `[0, n_classes)`.
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize], n_classes: usize) -> Result<()>;

    /// Predict the class index of one vector.
    fn predict(&self, features: &[f64]) -> Result<usize>;

    /// Predict a batch of vectors.
    fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Width of the vectors this classifier was fit on.
    fn n_features(&self) -> usize;

    fn n_classes(&self) -> usize;

    fn name(&self) -> &str;
}
