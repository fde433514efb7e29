//! # Inference Service
//!
//! Raw form fields in, [`Recommendation`] out:
//!
//! ```text
//! raw strings → normalize → engineer → one-hot + reindex → scale
//!             → forest → label decode → catalog lookup → report
//! ```
//!
//! A service is immutable once built and is shared across request handlers
//! behind an `Arc`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactManifest, TrainedArtifacts};
use crate::config::CareerConfig;
use crate::core::classifier::Classifier;
use crate::core::encoder::UnknownCategoryPolicy;
use crate::core::forest::RandomForest;
use crate::core::label::LabelCodec;
use crate::core::pipeline::FeaturePipeline;
use crate::core::record::Record;
use crate::error::Result;
use crate::report::RoleReport;
use crate::roles::{RoleCatalog, RoleInfo};

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub role: String,
    pub class_index: usize,
    pub info: RoleInfo,
}

impl Recommendation {
    pub fn report(&self) -> RoleReport {
        RoleReport::new(self.role.clone(), self.info.clone())
    }
}

#[derive(Debug)]
pub struct InferenceService {
    pipeline: FeaturePipeline,
    classifier: RandomForest,
    label_codec: LabelCodec,
    manifest: Option<ArtifactManifest>,
    catalog: RoleCatalog,
}

impl InferenceService {
    pub fn from_artifacts(artifacts: TrainedArtifacts, catalog: RoleCatalog) -> Self {
        let pipeline = artifacts.pipeline();
        Self {
            pipeline,
            classifier: artifacts.classifier,
            label_codec: artifacts.label_codec,
            manifest: artifacts.manifest,
            catalog,
        }
    }

    /// Load a bundle with the embedded role catalog.
    pub fn load(dir: &Path) -> Result<Self> {
        let artifacts = TrainedArtifacts::load(dir)?;
        Ok(Self::from_artifacts(artifacts, RoleCatalog::embedded().clone()))
    }

    /// Load using the `[inference]` section of `config`. `dir` overrides
    /// `[artifacts] dir`.
    pub fn from_config(config: &CareerConfig, dir: Option<&Path>) -> Result<Self> {
        let dir = dir.unwrap_or(&config.artifacts.dir);
        let catalog = RoleCatalog::load(config.inference.roles_path())?;
        let artifacts = TrainedArtifacts::load(dir)?;
        Ok(Self::from_artifacts(artifacts, catalog)
            .with_policy(config.inference.category_policy()))
    }

    pub fn with_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.pipeline = self.pipeline.with_policy(policy);
        self
    }

    /// Class index and role name for a normalized record.
    pub fn predict(&self, record: &Record) -> Result<(usize, &str)> {
        let scaled = self.pipeline.transform(record)?;
        let class_index = self.classifier.predict(&scaled)?;
        let role = self.label_codec.decode(class_index)?;
        Ok((class_index, role))
    }

    pub fn recommend(&self, record: &Record) -> Result<Recommendation> {
        let (class_index, role) = self.predict(record)?;
        let info = self.catalog.lookup(role);
        tracing::debug!(role, class_index, "prediction");
        Ok(Recommendation {
            role: role.to_string(),
            class_index,
            info,
        })
    }

    /// Normalize raw string fields, then [`recommend`](Self::recommend).
    pub fn recommend_raw<I, K, V>(&self, fields: I) -> Result<Recommendation>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        self.recommend(&Record::from_raw(fields))
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    pub fn classes(&self) -> &[String] {
        self.label_codec.classes()
    }

    pub fn n_features(&self) -> usize {
        self.pipeline.columns().len()
    }

    pub fn n_estimators(&self) -> usize {
        self.classifier.trees().len()
    }

    pub fn manifest(&self) -> Option<&ArtifactManifest> {
        self.manifest.as_ref()
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forest::ForestConfig;
    use crate::core::transforms::SOURCE_FIELDS;
    use crate::error::CareerError;

    fn form(base: f64, cert: &str) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = SOURCE_FIELDS
            .iter()
            .map(|f| (f.to_string(), base.to_string()))
            .collect();
        fields.push(("certifications".into(), cert.into()));
        fields.push(("self-learning capability?".into(), "Yes".into()));
        fields
    }

    fn service(labels: [&str; 2]) -> InferenceService {
        let records: Vec<Record> = [(50.0, "python"), (95.0, "hadoop")]
            .iter()
            .cycle()
            .take(8)
            .map(|(b, c)| Record::from_raw(form(*b, c)))
            .collect();
        let (pipeline, matrix) = FeaturePipeline::fit(&records).unwrap();
        let y: Vec<usize> = (0..8).map(|i| i % 2).collect();
        let mut forest = RandomForest::new(ForestConfig {
            n_estimators: 4,
            ..ForestConfig::default()
        });
        forest.fit(&matrix, &y, 2).unwrap();
        let codec = LabelCodec::fit(labels);
        let artifacts = TrainedArtifacts::new(forest, pipeline, codec, None).unwrap();
        InferenceService::from_artifacts(artifacts, RoleCatalog::embedded().clone())
    }

    #[test]
    fn test_recommend() {
        let svc = service(["Network Engineer", "Web Developer"]);
        let low = svc.recommend_raw(form(52.0, "python")).unwrap();
        assert_eq!(low.role, "Network Engineer");
        assert_eq!(low.class_index, 0);
        assert!(low.info.skills.contains("TCP/IP"));
        let high = svc.recommend_raw(form(93.0, "hadoop")).unwrap();
        assert_eq!(high.role, "Web Developer");
        assert!(high.report().to_text().starts_with("Predicted Role: Web Developer"));
    }

    #[test]
    fn test_unknown_role_gets_placeholder() {
        let svc = service(["Astronaut", "Zookeeper"]);
        let rec = svc.recommend_raw(form(50.0, "python")).unwrap();
        assert_eq!(rec.role, "Astronaut");
        assert_eq!(rec.info, RoleInfo::placeholder());
    }

    #[test]
    fn test_missing_field() {
        let svc = service(["Network Engineer", "Web Developer"]);
        let mut fields = form(50.0, "python");
        fields.retain(|(k, _)| k != "Percentage in Mathematics");
        let err = svc.recommend_raw(fields).unwrap_err();
        assert!(err.is_feature_contract_error());
    }

    #[test]
    fn test_strict_policy() {
        let svc = service(["Network Engineer", "Web Developer"])
            .with_policy(UnknownCategoryPolicy::Reject);
        let err = svc.recommend_raw(form(50.0, "cobol")).unwrap_err();
        assert!(matches!(err, CareerError::UnknownCategory { .. }));
    }

    #[test]
    fn test_shape_is_canonical() {
        let svc = service(["Network Engineer", "Web Developer"]);
        let mut fields = form(50.0, "python");
        fields.push(("brand new field".into(), "whatever".into()));
        let record = Record::from_raw(fields);
        let vector = svc.pipeline().transform(&record).unwrap();
        assert_eq!(vector.len(), svc.n_features());
        assert!(!svc.pipeline().columns().contains("brand new field_whatever"));
    }
}
