//! # Training Pipeline
//!
//! One offline batch run:
//!
//! 1. Load the CSV, drop excluded columns, normalize every cell
//! 2. Feature engineering, one-hot layout, standardization
//! 3. Fit the label codec on the target column
//! 4. Oversample minority classes, then a seeded train/test split
//! 5. Fit the forest, evaluate on the held-out split
//! 6. Bundle (and optionally persist) the artifacts

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifacts::TrainedArtifacts;
use crate::config::TrainingConfig;
use crate::core::classifier::Classifier;
use crate::core::forest::RandomForest;
use crate::core::label::LabelCodec;
use crate::core::metrics::{accuracy, ClassificationReport};
use crate::core::pipeline::FeaturePipeline;
use crate::core::sampling::{random_oversample, train_test_split, Dataset};
use crate::dataset::{load_csv, LabeledRecords};
use crate::error::{CareerError, Result};

/// What a training run produced, for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub resampled_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub accuracy: f64,
    pub report: ClassificationReport,
}

pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Load the configured dataset and fit.
    pub fn run(&self) -> Result<(TrainedArtifacts, TrainingSummary)> {
        let data = load_csv(
            &self.config.dataset,
            &self.config.target_column,
            &self.config.exclude_columns,
        )?;
        self.fit(&data)
    }

    /// Fit and write the bundle into `dir`.
    pub fn run_and_save(&self, dir: &Path) -> Result<TrainingSummary> {
        let (artifacts, summary) = self.run()?;
        artifacts.save(dir)?;
        Ok(summary)
    }

    /// Fit on already-loaded records.
    pub fn fit(&self, data: &LabeledRecords) -> Result<(TrainedArtifacts, TrainingSummary)> {
        if data.is_empty() {
            return Err(CareerError::Training("no training rows".into()));
        }

        let codec = LabelCodec::fit(data.labels.iter().map(String::as_str));
        let labels = codec.encode_all(&data.labels)?;
        if codec.len() < 2 {
            return Err(CareerError::Training(format!(
                "need at least 2 distinct roles, found {}",
                codec.len()
            )));
        }

        let (pipeline, matrix) = FeaturePipeline::fit(&data.records)?;
        let n_features = pipeline.columns().len();
        tracing::info!(
            rows = data.len(),
            features = n_features,
            classes = codec.len(),
            "features prepared"
        );

        let dataset = Dataset::new(matrix, labels)?;
        let balanced = random_oversample(&dataset, codec.len(), self.config.seed);
        let (train, test) = train_test_split(&balanced, self.config.test_size, self.config.seed)?;
        tracing::info!(
            resampled = balanced.len(),
            train = train.len(),
            test = test.len(),
            "split dataset"
        );

        let mut forest = RandomForest::new(self.config.forest());
        forest.fit(&train.features, &train.labels, codec.len())?;

        let predicted = forest.predict_batch(&test.features)?;
        let test_accuracy = accuracy(&test.labels, &predicted);
        let report = ClassificationReport::new(&test.labels, &predicted, codec.classes());
        tracing::info!(accuracy = test_accuracy, "model evaluated");

        let summary = TrainingSummary {
            rows: data.len(),
            resampled_rows: balanced.len(),
            train_rows: train.len(),
            test_rows: test.len(),
            n_features,
            n_classes: codec.len(),
            accuracy: test_accuracy,
            report,
        };
        let artifacts = TrainedArtifacts::new(forest, pipeline, codec, Some(test_accuracy))?;
        Ok((artifacts, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;
    use crate::core::transforms::SOURCE_FIELDS;

    fn rows() -> LabeledRecords {
        let mut data = LabeledRecords::default();
        for i in 0..30 {
            let (base, cert, role) = match i % 3 {
                0 => (60.0, "python", "Web Developer"),
                1 => (75.0, "shell programming", "Network Engineer"),
                _ => (90.0, "r programming", "Data Architect"),
            };
            let mut record = Record::new();
            for (j, field) in SOURCE_FIELDS.iter().enumerate() {
                record.insert(*field, (base + j as f64 + (i % 5) as f64).into());
            }
            data.records.push(record.with("certifications", cert));
            data.labels.push(role.to_string());
        }
        data
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            n_estimators: 5,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_fit_separable() {
        let (artifacts, summary) = TrainingPipeline::new(small_config()).fit(&rows()).unwrap();
        assert_eq!(summary.n_classes, 3);
        assert_eq!(summary.rows, 30);
        assert_eq!(summary.test_rows, 6);
        assert_eq!(summary.train_rows + summary.test_rows, summary.resampled_rows);
        assert!(summary.accuracy >= 0.8);
        assert_eq!(artifacts.feature_columns.len(), summary.n_features);
        assert_eq!(
            artifacts.label_codec.classes(),
            &["Data Architect", "Network Engineer", "Web Developer"]
        );
    }

    #[test]
    fn test_single_class_rejected() {
        let mut data = rows();
        data.labels.iter_mut().for_each(|l| *l = "Web Developer".into());
        assert!(TrainingPipeline::new(small_config()).fit(&data).is_err());
    }

    #[test]
    fn test_missing_dataset() {
        let config = TrainingConfig {
            dataset: "/no/such/dataset.csv".into(),
            ..small_config()
        };
        let err = TrainingPipeline::new(config).run().unwrap_err();
        assert!(matches!(err, CareerError::DatasetNotFound(_)));
    }
}
