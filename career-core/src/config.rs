//! Configuration (career.toml)
//!
//! ```toml
//! [training]
//! dataset = "dataset.csv"
//! target_column = "Suggested Job Role"
//! test_size = 0.2
//! seed = 42
//! n_estimators = 25
//! max_depth = 0
//!
//! [artifacts]
//! dir = "artifacts"
//!
//! [inference]
//! strict_categories = false
//! roles_file = ""
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::encoder::UnknownCategoryPolicy;
use crate::core::forest::ForestConfig;
use crate::error::{CareerError, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CAREER_CONFIG";

/// Columns the trainer drops before feature engineering.
pub const DEFAULT_EXCLUDE_COLUMNS: [&str; 10] = [
    "Logical quotient rating",
    "talenttests taken?",
    "olympiads",
    "Taken inputs from seniors or elders",
    "interested in games",
    "Interested Type of Books",
    "Salary Range Expected",
    "In a Realtionship?",
    "Salary/work",
    "Gentle or Tuff behaviour?",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerConfig {
    #[serde(default)]
    pub training: TrainingConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,

    #[serde(default = "default_target_column")]
    pub target_column: String,

    #[serde(default = "default_exclude_columns")]
    pub exclude_columns: Vec<String>,

    #[serde(default = "default_test_size")]
    pub test_size: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// 0 means unlimited depth.
    #[serde(default)]
    pub max_depth: usize,

    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
}

fn default_dataset() -> PathBuf {
    PathBuf::from("dataset.csv")
}

fn default_target_column() -> String {
    "Suggested Job Role".to_string()
}

fn default_exclude_columns() -> Vec<String> {
    DEFAULT_EXCLUDE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_test_size() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_n_estimators() -> usize {
    25
}

fn default_min_samples_split() -> usize {
    2
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            target_column: default_target_column(),
            exclude_columns: default_exclude_columns(),
            test_size: default_test_size(),
            seed: default_seed(),
            n_estimators: default_n_estimators(),
            max_depth: 0,
            min_samples_split: default_min_samples_split(),
        }
    }
}

impl TrainingConfig {
    /// Forest hyper-parameters derived from this section.
    pub fn forest(&self) -> ForestConfig {
        ForestConfig {
            n_estimators: self.n_estimators,
            max_depth: (self.max_depth > 0).then_some(self.max_depth),
            min_samples_split: self.min_samples_split,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Reject categorical values the model never saw.
    #[serde(default)]
    pub strict_categories: bool,

    /// Role catalog override; empty uses the embedded catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles_file: Option<PathBuf>,
}

impl InferenceConfig {
    pub fn category_policy(&self) -> UnknownCategoryPolicy {
        if self.strict_categories {
            UnknownCategoryPolicy::Reject
        } else {
            UnknownCategoryPolicy::Ignore
        }
    }

    /// Override path, treating an empty string as unset.
    pub fn roles_path(&self) -> Option<&Path> {
        self.roles_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl CareerConfig {
    /// Parse and validate TOML content.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: CareerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CareerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Load from `path`, else from `$CAREER_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(env_path) if !env_path.is_empty() => Self::from_file(Path::new(&env_path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CareerError::Config(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.training;
        if !(t.test_size > 0.0 && t.test_size < 1.0) {
            return Err(CareerError::Config(format!(
                "training.test_size must be in (0, 1), got {}",
                t.test_size
            )));
        }
        if t.n_estimators == 0 {
            return Err(CareerError::Config(
                "training.n_estimators must be at least 1".into(),
            ));
        }
        if t.min_samples_split < 2 {
            return Err(CareerError::Config(format!(
                "training.min_samples_split must be at least 2, got {}",
                t.min_samples_split
            )));
        }
        if t.target_column.trim().is_empty() {
            return Err(CareerError::Config("training.target_column is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CareerConfig::from_str("").unwrap();
        assert_eq!(config, CareerConfig::default());
        assert_eq!(config.training.test_size, 0.2);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.n_estimators, 25);
        assert_eq!(config.training.exclude_columns.len(), 10);
        assert_eq!(config.artifacts.dir, PathBuf::from("artifacts"));
        assert_eq!(config.inference.category_policy(), UnknownCategoryPolicy::Ignore);
        assert!(config.inference.roles_path().is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = CareerConfig::from_str(
            r#"
[training]
seed = 7
max_depth = 12

[inference]
strict_categories = true
roles_file = ""
"#,
        )
        .unwrap();
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.target_column, "Suggested Job Role");
        let forest = config.training.forest();
        assert_eq!(forest.max_depth, Some(12));
        assert_eq!(forest.seed, 7);
        assert_eq!(config.inference.category_policy(), UnknownCategoryPolicy::Reject);
        assert!(config.inference.roles_path().is_none());
    }

    #[test]
    fn test_unlimited_depth() {
        assert_eq!(TrainingConfig::default().forest().max_depth, None);
    }

    #[test]
    fn test_validation() {
        assert!(CareerConfig::from_str("[training]\ntest_size = 1.0").is_err());
        assert!(CareerConfig::from_str("[training]\nn_estimators = 0").is_err());
        assert!(CareerConfig::from_str("[training]\nmin_samples_split = 1").is_err());
        assert!(CareerConfig::from_str("[training\n").is_err());
    }

    #[test]
    fn test_round_trip() {
        let config = CareerConfig::default();
        let text = config.to_string().unwrap();
        assert_eq!(CareerConfig::from_str(&text).unwrap(), config);
    }
}
