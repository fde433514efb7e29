//! # Artifact Bundle
//!
//! The trainer persists four JSON files plus a manifest into one directory:
//!
//! | File | Content |
//! |------|---------|
//! | `model.json` | fitted [`RandomForest`] |
//! | `scaler.json` | [`StandardScaler`] statistics |
//! | `columns.json` | canonical [`FeatureColumns`] |
//! | `label_codec.json` | [`LabelCodec`] classes |
//! | `manifest.json` | [`ArtifactManifest`] (optional on load) |
//!
//! A bundle that loads is internally consistent: scaler width, column count
//! and classifier width agree, and the label codec covers every class the
//! classifier can emit.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::classifier::Classifier;
use crate::core::encoder::FeatureColumns;
use crate::core::forest::RandomForest;
use crate::core::label::LabelCodec;
use crate::core::pipeline::FeaturePipeline;
use crate::core::stats::StandardScaler;
use crate::error::{CareerError, Result};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const COLUMNS_FILE: &str = "columns.json";
pub const LABEL_CODEC_FILE: &str = "label_codec.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Bumped whenever the on-disk layout changes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format_version: u32,
    pub n_features: usize,
    pub n_classes: usize,
    pub n_estimators: usize,
    #[serde(default)]
    pub test_accuracy: Option<f64>,
}

/// Everything the serving path needs.
#[derive(Debug, Clone)]
pub struct TrainedArtifacts {
    pub classifier: RandomForest,
    pub scaler: StandardScaler,
    pub feature_columns: FeatureColumns,
    pub label_codec: LabelCodec,
    pub manifest: Option<ArtifactManifest>,
}

impl TrainedArtifacts {
    /// Bundle fitted parts and derive a manifest for them.
    pub fn new(
        classifier: RandomForest,
        pipeline: FeaturePipeline,
        label_codec: LabelCodec,
        test_accuracy: Option<f64>,
    ) -> Result<Self> {
        let (feature_columns, scaler) = pipeline.into_parts();
        let manifest = ArtifactManifest {
            format_version: FORMAT_VERSION,
            n_features: feature_columns.len(),
            n_classes: label_codec.len(),
            n_estimators: classifier.trees().len(),
            test_accuracy,
        };
        let artifacts = Self {
            classifier,
            scaler,
            feature_columns,
            label_codec,
            manifest: Some(manifest),
        };
        artifacts.check_consistency()?;
        Ok(artifacts)
    }

    /// Rebuild the feature pipeline these artifacts were trained with.
    pub fn pipeline(&self) -> FeaturePipeline {
        FeaturePipeline::new(self.feature_columns.clone(), self.scaler.clone())
    }

    /// Write the bundle, creating `dir` if needed.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        write_json(&dir.join(MODEL_FILE), &self.classifier)?;
        write_json(&dir.join(SCALER_FILE), &self.scaler)?;
        write_json(&dir.join(COLUMNS_FILE), &self.feature_columns)?;
        write_json(&dir.join(LABEL_CODEC_FILE), &self.label_codec)?;
        if let Some(manifest) = &self.manifest {
            write_json(&dir.join(MANIFEST_FILE), manifest)?;
        }
        tracing::info!(dir = %dir.display(), "artifacts saved");
        Ok(())
    }

    /// Load and cross-check a bundle.
    pub fn load(dir: &Path) -> Result<Self> {
        let classifier: RandomForest = read_json(&dir.join(MODEL_FILE))?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;
        let feature_columns: FeatureColumns = read_json(&dir.join(COLUMNS_FILE))?;
        let label_codec: LabelCodec = read_json(&dir.join(LABEL_CODEC_FILE))?;

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            Some(read_json::<ArtifactManifest>(&manifest_path)?)
        } else {
            tracing::warn!(dir = %dir.display(), "artifact bundle has no manifest");
            None
        };

        let artifacts = Self {
            classifier,
            scaler,
            feature_columns,
            label_codec,
            manifest,
        };
        artifacts.check_consistency()?;
        tracing::info!(
            dir = %dir.display(),
            features = artifacts.feature_columns.len(),
            classes = artifacts.label_codec.len(),
            "artifacts loaded"
        );
        Ok(artifacts)
    }

    /// True when every required file exists in `dir`.
    pub fn exists(dir: &Path) -> bool {
        [MODEL_FILE, SCALER_FILE, COLUMNS_FILE, LABEL_CODEC_FILE]
            .iter()
            .all(|f| dir.join(f).is_file())
    }

    fn check_consistency(&self) -> Result<()> {
        let width = self.feature_columns.len();
        if self.scaler.width() != width {
            return Err(corrupt(format!(
                "scaler has {} columns, feature list has {width}",
                self.scaler.width()
            )));
        }
        if !self.classifier.is_fitted() {
            return Err(corrupt("model has no trees".into()));
        }
        if self.classifier.n_features() != width {
            return Err(corrupt(format!(
                "model expects {} features, feature list has {width}",
                self.classifier.n_features()
            )));
        }
        self.classifier.validate()?;
        if self.classifier.n_classes() > self.label_codec.len() {
            return Err(corrupt(format!(
                "model emits {} classes, label codec knows {}",
                self.classifier.n_classes(),
                self.label_codec.len()
            )));
        }

        if let Some(manifest) = &self.manifest {
            if manifest.format_version != FORMAT_VERSION {
                return Err(corrupt(format!(
                    "manifest format version {} (expected {FORMAT_VERSION})",
                    manifest.format_version
                )));
            }
            if manifest.n_features != width || manifest.n_classes != self.label_codec.len() {
                return Err(corrupt(format!(
                    "manifest records {} features / {} classes, bundle has {width} / {}",
                    manifest.n_features,
                    manifest.n_classes,
                    self.label_codec.len()
                )));
            }
        }
        Ok(())
    }
}

fn corrupt(message: String) -> CareerError {
    CareerError::ArtifactCorrupt(message)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(CareerError::ArtifactNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| corrupt(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content).map_err(|e| corrupt(format!("{}: {e}", path.display())))
}
