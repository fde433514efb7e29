//! Data models for API requests and responses

use std::collections::BTreeMap;

use career_core::{ArtifactManifest, Recommendation, RoleInfo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Request Models
// ============================================================================

/// Request body for the JSON prediction endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Form fields by dataset column name. Values may be numbers, strings
    /// (`"yes"`/`"no"` are read as 1/0) or booleans.
    #[schema(value_type = Object)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

// ============================================================================
// Response Models
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the operation succeeded
    pub success: bool,

    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error information (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Error information in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Error code
    #[schema(example = "PREDICTION_ERROR")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "Prediction Error: Missing field: 'Percentage in Mathematics'. Please check inputs.")]
    pub message: String,

    /// Helpful suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Role reference text
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleDetails {
    #[schema(example = "Designs and develops websites and web applications.")]
    pub description: String,

    #[schema(example = "HTML, CSS, JavaScript, React, Angular")]
    pub skills: String,

    #[schema(example = "Google, Facebook, LinkedIn")]
    pub potential_companies: String,
}

impl From<RoleInfo> for RoleDetails {
    fn from(info: RoleInfo) -> Self {
        Self {
            description: info.description,
            skills: info.skills,
            potential_companies: info.potential_companies,
        }
    }
}

/// Prediction result
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionResult {
    /// Predicted role name
    #[schema(example = "Web Developer")]
    pub role: String,

    /// Class index of the role in the label codec
    #[schema(example = 31)]
    pub class_index: usize,

    pub info: RoleDetails,

    /// Plain-text rendering of the report
    pub report: String,
}

impl From<Recommendation> for PredictionResult {
    fn from(rec: Recommendation) -> Self {
        let report = rec.report().to_text();
        Self {
            role: rec.role,
            class_index: rec.class_index,
            info: rec.info.into(),
            report,
        }
    }
}

/// One catalog entry
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleEntry {
    #[schema(example = "Web Developer")]
    pub name: String,

    #[serde(flatten)]
    pub details: RoleDetails,
}

/// Role catalog listing
#[derive(Debug, Serialize, ToSchema)]
pub struct RolesResult {
    #[schema(example = 34)]
    pub count: usize,
    pub roles: Vec<RoleEntry>,
}

/// Artifact manifest as written by the trainer
#[derive(Debug, Serialize, ToSchema)]
pub struct ManifestInfo {
    #[schema(example = 1)]
    pub format_version: u32,
    pub n_features: usize,
    pub n_classes: usize,
    pub n_estimators: usize,
    pub test_accuracy: Option<f64>,
}

impl From<&ArtifactManifest> for ManifestInfo {
    fn from(m: &ArtifactManifest) -> Self {
        Self {
            format_version: m.format_version,
            n_features: m.n_features,
            n_classes: m.n_classes,
            n_estimators: m.n_estimators,
            test_accuracy: m.test_accuracy,
        }
    }
}

/// Loaded model summary
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelInfo {
    /// Width of the feature vector
    #[schema(example = 52)]
    pub n_features: usize,

    #[schema(example = 25)]
    pub n_estimators: usize,

    /// Role names in class-index order
    pub classes: Vec<String>,

    /// Canonical feature columns in vector order
    pub feature_columns: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestInfo>,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    #[schema(example = "healthy")]
    pub status: &'static str,

    /// Service version
    #[schema(example = "2026.10.16")]
    pub version: &'static str,

    /// Whether the model bundle has been loaded
    pub model_loaded: bool,
}
