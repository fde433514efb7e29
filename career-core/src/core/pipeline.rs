//! Feature Pipeline - raw record to scaled vector
//!
//! Unified interface for:
//! 1. Composite feature transform
//! 2. One-hot expansion + reindex to the canonical columns
//! 3. Standardization with the training statistics
//!
//! The same [`FeaturePipeline`] value is produced by training and rebuilt
//! from artifacts at serving time, so both paths share one code path.

use crate::core::encoder::{FeatureColumns, OneHotEncoder, UnknownCategoryPolicy};
use crate::core::record::Record;
use crate::core::stats::StandardScaler;
use crate::core::transforms::{engineer, engineer_all};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePipeline {
    columns: FeatureColumns,
    scaler: StandardScaler,
    policy: UnknownCategoryPolicy,
}

impl FeaturePipeline {
    /// Assemble a pipeline from fitted parts.
    pub fn new(columns: FeatureColumns, scaler: StandardScaler) -> Self {
        Self {
            columns,
            scaler,
            policy: UnknownCategoryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fit columns and scaler on normalized training records.
    ///
    /// Returns the pipeline together with the scaled training matrix.
    pub fn fit(records: &[Record]) -> Result<(Self, Vec<Vec<f64>>)> {
        let engineered = engineer_all(records)?;
        let columns = OneHotEncoder::fit(&engineered);
        let matrix = OneHotEncoder::transform(&columns, &engineered);
        let (scaler, scaled) = StandardScaler::fit_transform(&matrix)?;

        tracing::debug!(
            rows = records.len(),
            columns = columns.len(),
            "feature pipeline fitted"
        );
        Ok((Self::new(columns, scaler), scaled))
    }

    /// Engineered, reindexed but unscaled vector. Width is always
    /// `self.columns().len()`.
    pub fn feature_vector(&self, record: &Record) -> Result<Vec<f64>> {
        let engineered = engineer(record)?;
        self.columns.encode(&engineered, self.policy)
    }

    /// Full transform to the scaled vector the classifier consumes.
    pub fn transform(&self, record: &Record) -> Result<Vec<f64>> {
        let features = self.feature_vector(record)?;
        self.scaler.transform(&features)
    }

    pub fn columns(&self) -> &FeatureColumns {
        &self.columns
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.policy
    }

    pub fn into_parts(self) -> (FeatureColumns, StandardScaler) {
        (self.columns, self.scaler)
    }
}
