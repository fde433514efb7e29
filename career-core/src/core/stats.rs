//! # Feature Statistics
//!
//! Per-column standardization: `(x - mean_i) / scale_i`.
//! Statistics are fit once on the training matrix and persisted; serving
//! only ever calls [`StandardScaler::transform`].

use serde::{Deserialize, Serialize};

use crate::error::{CareerError, Result};

/// Mean of a column slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance: σ² = (1/n) Σ (xi - μ)²
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    values.iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Fitted standardization statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    /// Standard deviation per column, 1.0 where the column is constant.
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on a row-major matrix. All rows must share one width.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != width) {
            return Err(CareerError::ShapeMismatch {
                expected: width,
                actual: bad.len(),
            });
        }

        let mut mean_out = Vec::with_capacity(width);
        let mut scale_out = Vec::with_capacity(width);
        let mut column = Vec::with_capacity(rows.len());

        for j in 0..width {
            column.clear();
            column.extend(rows.iter().map(|r| r[j]));
            let sd = std(&column);
            mean_out.push(mean(&column));
            scale_out.push(if sd < f64::EPSILON { 1.0 } else { sd });
        }

        Ok(Self {
            mean: mean_out,
            scale: scale_out,
        })
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one feature vector with the saved statistics.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.width() {
            return Err(CareerError::ShapeMismatch {
                expected: self.width(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mu, s))| (x - mu) / s)
            .collect())
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    /// Fit then transform, as done once at training time.
    pub fn fit_transform(rows: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>)> {
        let scaler = Self::fit(rows)?;
        let scaled = scaler.transform_all(rows)?;
        Ok((scaler, scaled))
    }
}
