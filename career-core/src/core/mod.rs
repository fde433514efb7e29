//! # Core Pipeline Primitives
//!
//! The feature contract shared by training and serving:
//! - Records and value normalization
//! - Composite feature transform
//! - One-hot encoding and column reconciliation
//! - Standardization statistics
//! - Label codec
//! - Classifier trait and random forest
//! - Resampling and evaluation metrics
//! - Feature pipeline integration

pub mod record;
pub mod transforms;
pub mod encoder;
pub mod stats;
pub mod label;
pub mod classifier;
pub mod forest;
pub mod sampling;
pub mod metrics;
pub mod pipeline;

pub use record::{FieldValue, Record};
pub use transforms::{engineer, engineer_all, CompositeFeature, COMPOSITES, SOURCE_FIELDS};
pub use encoder::{expand, indicator_column, FeatureColumns, OneHotEncoder, UnknownCategoryPolicy};
pub use stats::StandardScaler;
pub use label::LabelCodec;
pub use classifier::Classifier;
pub use forest::{DecisionTree, ForestConfig, RandomForest};
pub use sampling::{random_oversample, train_test_split, Dataset};
pub use metrics::{accuracy, ClassMetrics, ClassificationReport};
pub use pipeline::FeaturePipeline;

/// Prelude module for core exports
pub mod prelude {
    pub use crate::core::record::{FieldValue, Record};
    pub use crate::core::transforms::{engineer, COMPOSITES, SOURCE_FIELDS};
    pub use crate::core::encoder::{FeatureColumns, OneHotEncoder, UnknownCategoryPolicy};
    pub use crate::core::stats::StandardScaler;
    pub use crate::core::label::LabelCodec;
    pub use crate::core::classifier::Classifier;
    pub use crate::core::forest::{ForestConfig, RandomForest};
    pub use crate::core::pipeline::FeaturePipeline;
}
