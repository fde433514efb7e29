//! Error types for career-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type for career-core operations
pub type Result<T> = std::result::Result<T, CareerError>;

/// career-core error types
#[derive(Error, Debug)]
pub enum CareerError {
    // Artifact-load failures
    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Artifact corrupt: {0}")]
    ArtifactCorrupt(String),

    // Feature-contract failures
    #[error("Missing field: '{0}'")]
    MissingField(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Unknown label: '{0}'")]
    UnknownLabel(String),

    #[error("Unknown class index: {0}")]
    UnknownClass(usize),

    #[error("Unrecognised category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    // Training-data failures
    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl CareerError {
    /// True for failures caused by a missing or unreadable artifact bundle.
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            CareerError::ArtifactNotFound(_) | CareerError::ArtifactCorrupt(_)
        )
    }

    /// True for failures of the raw-input to feature-vector contract.
    pub fn is_feature_contract_error(&self) -> bool {
        matches!(
            self,
            CareerError::MissingField(_)
                | CareerError::InvalidValue { .. }
                | CareerError::ShapeMismatch { .. }
                | CareerError::UnknownLabel(_)
                | CareerError::UnknownClass(_)
                | CareerError::UnknownCategory { .. }
        )
    }
}

impl From<std::io::Error> for CareerError {
    fn from(err: std::io::Error) -> Self {
        CareerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CareerError {
    fn from(err: serde_json::Error) -> Self {
        CareerError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for CareerError {
    fn from(err: csv::Error) -> Self {
        CareerError::Csv(err.to_string())
    }
}

impl From<toml::de::Error> for CareerError {
    fn from(err: toml::de::Error) -> Self {
        CareerError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_groups() {
        assert!(CareerError::ArtifactNotFound(PathBuf::from("model.json")).is_artifact_error());
        assert!(CareerError::MissingField("x".into()).is_feature_contract_error());
        assert!(!CareerError::DatasetNotFound(PathBuf::from("d.csv")).is_feature_contract_error());
        assert!(!CareerError::UnknownClass(3).is_artifact_error());
    }

    #[test]
    fn test_display() {
        let err = CareerError::ShapeMismatch { expected: 4, actual: 2 };
        assert_eq!(err.to_string(), "Shape mismatch: expected 4, got 2");
    }
}
