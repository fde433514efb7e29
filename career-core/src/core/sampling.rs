//! Resampling helpers used by the training pipeline.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{CareerError, Result};

/// A labelled, row-major matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
}

impl Dataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<usize>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(CareerError::ShapeMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of rows per class index.
    pub fn class_counts(&self, n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; n_classes];
        for &label in &self.labels {
            if label < n_classes {
                counts[label] += 1;
            }
        }
        counts
    }

    fn select(&self, rows: &[usize]) -> Self {
        Self {
            features: rows.iter().map(|&i| self.features[i].clone()).collect(),
            labels: rows.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// Duplicate random rows of every minority class until each class present
/// has as many rows as the largest one. Original rows come first.
pub fn random_oversample(data: &Dataset, n_classes: usize, seed: u64) -> Dataset {
    let counts = data.class_counts(n_classes);
    let target = counts.iter().copied().max().unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (row, &label) in data.labels.iter().enumerate() {
        if label < n_classes {
            by_class[label].push(row);
        }
    }

    let mut rows: Vec<usize> = (0..data.len()).collect();
    for members in by_class.iter().filter(|m| !m.is_empty()) {
        for _ in members.len()..target {
            rows.push(members[rng.gen_range(0..members.len())]);
        }
    }

    data.select(&rows)
}

/// Shuffled split into `(train, test)`; the test side gets
/// `ceil(len * test_size)` rows.
pub fn train_test_split(data: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(CareerError::Config(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (data.len() as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= data.len() {
        return Err(CareerError::Training(format!(
            "cannot split {} rows with test_size {test_size}",
            data.len()
        )));
    }

    let mut rows: Vec<usize> = (0..data.len()).collect();
    rows.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test_rows, train_rows) = rows.split_at(n_test);

    Ok((data.select(train_rows), data.select(test_rows)))
}
