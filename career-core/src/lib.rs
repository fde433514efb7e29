//! # career-core - Career Role Recommendation
//!
//! Feature pipeline, classifier and role catalog behind the Career Compass
//! recommender.
//!
//! ## Modules
//!
//! - **core**: records, composite features, one-hot layout, scaler, label
//!   codec, random forest, resampling and metrics
//! - **dataset**: CSV loading for training
//! - **training**: offline training pipeline
//! - **artifacts**: persisted model bundle
//! - **inference**: raw form fields to a recommendation
//! - **roles**: role reference catalog
//! - **report**: text / PDF report rendering
//! - **config**: `career.toml` configuration
//!
//! ## Example
//!
//! ```no_run
//! use career_core::prelude::*;
//! use std::path::Path;
//!
//! let service = InferenceService::load(Path::new("artifacts"))?;
//! let rec = service.recommend_raw([("percentage in Algorithms", "80")])?;
//! println!("{}", rec.report());
//! # Ok::<(), career_core::CareerError>(())
//! ```

pub mod error;
pub use error::{CareerError, Result};

pub mod core;
pub use core::prelude::*;

pub mod artifacts;
pub mod config;
pub mod dataset;
pub mod inference;
pub mod report;
pub mod roles;
pub mod training;

pub use artifacts::{ArtifactManifest, TrainedArtifacts};
pub use config::CareerConfig;
pub use inference::{InferenceService, Recommendation};
pub use report::RoleReport;
pub use roles::{RoleCatalog, RoleInfo};
pub use training::{TrainingPipeline, TrainingSummary};

/// Prelude module with common re-exports
pub mod prelude {
    pub use crate::error::{CareerError, Result};
    pub use crate::core::prelude::*;
    pub use crate::artifacts::TrainedArtifacts;
    pub use crate::config::CareerConfig;
    pub use crate::inference::{InferenceService, Recommendation};
    pub use crate::report::RoleReport;
    pub use crate::roles::{RoleCatalog, RoleInfo};
    pub use crate::training::{TrainingPipeline, TrainingSummary};
}
