//! Request handlers for API endpoints

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use career_core::report::PDF_FILE_NAME;
use career_core::{CareerError, FieldValue, Record};

use crate::models::*;
use crate::state::AppState;
use crate::templates;

pub type SharedState = Arc<AppState>;

/// Message shown whenever the model bundle cannot be loaded.
pub const ASSETS_MISSING_MESSAGE: &str = "Deployment Error: Model assets not found on server.";

/// Message shown for any failure on the prediction path.
pub fn prediction_error_message(err: &CareerError) -> String {
    format!("Prediction Error: {err}. Please check inputs.")
}

/// Map a core error to an HTTP status and API error
pub fn career_error_to_api(err: &CareerError) -> (StatusCode, ApiError) {
    if err.is_artifact_error() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError {
                code: "ARTIFACTS_UNAVAILABLE".to_string(),
                message: ASSETS_MISSING_MESSAGE.to_string(),
                help: Some("Train a model with `career train` and point CAREER_ARTIFACTS at the bundle".to_string()),
            },
        )
    } else if err.is_feature_contract_error() {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError {
                code: "PREDICTION_ERROR".to_string(),
                message: prediction_error_message(err),
                help: Some("Fill in every field of the form with the expected type".to_string()),
            },
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError {
                code: "INTERNAL_ERROR".to_string(),
                message: prediction_error_message(err),
                help: None,
            },
        )
    }
}

fn html_error(err: &CareerError) -> Response {
    let (status, api_error) = career_error_to_api(err);
    tracing::warn!(status = status.as_u16(), error = %err, "prediction failed");
    (status, Html(templates::result_page(&api_error.message))).into_response()
}

fn json_error<T: serde::Serialize>(err: &CareerError) -> (StatusCode, Json<ApiResponse<T>>) {
    let (status, api_error) = career_error_to_api(err);
    tracing::warn!(status = status.as_u16(), error = %err, "request failed");
    (status, Json(ApiResponse::error(api_error)))
}

/// Normalize JSON field values the same way form strings are normalized.
pub fn json_record(fields: BTreeMap<String, serde_json::Value>) -> Result<Record, CareerError> {
    fields
        .into_iter()
        .map(|(name, value)| match FieldValue::from_json(&value) {
            Some(field) => Ok((name, field)),
            None => Err(CareerError::InvalidValue {
                field: name,
                reason: format!("expected a number, string or boolean, got {value}"),
            }),
        })
        .collect()
}

/// Recommendation form
#[utoipa::path(
    get,
    path = "/",
    tag = "web",
    responses(
        (status = 200, description = "HTML form", content_type = "text/html", body = String),
    )
)]
pub async fn index_handler() -> Html<&'static str> {
    Html(templates::index_page())
}

/// Predict from the HTML form and download the PDF report
#[utoipa::path(
    post,
    path = "/predict",
    tag = "web",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "Form fields named after the dataset columns"),
    responses(
        (status = 200, description = "PDF report attachment", content_type = "application/pdf"),
        (status = 415, description = "Not a form submission", content_type = "text/html", body = String),
        (status = 422, description = "Prediction error page", content_type = "text/html", body = String),
        (status = 503, description = "Model assets not found", content_type = "text/html", body = String),
    )
)]
pub async fn predict_form_handler(
    State(state): State<SharedState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            tracing::warn!(status = rejection.status().as_u16(), error = %rejection, "form rejected");
            let message = format!("Prediction Error: {}. Please check inputs.", rejection.body_text());
            return (rejection.status(), Html(templates::result_page(&message))).into_response();
        }
    };

    let service = match state.service().await {
        Ok(service) => service,
        Err(err) => return html_error(&err),
    };

    let record = Record::from_raw(fields);
    let rendered = service
        .recommend(&record)
        .and_then(|rec| rec.report().to_pdf().map(|pdf| (rec.role, pdf)));

    match rendered {
        Ok((role, pdf)) => {
            tracing::info!(role = %role, bytes = pdf.len(), "report rendered");
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{PDF_FILE_NAME}\""),
                    ),
                ],
                pdf,
            )
                .into_response()
        }
        Err(err) => html_error(&err),
    }
}

/// Predict a role from JSON fields
#[utoipa::path(
    post,
    path = "/api/predict",
    tag = "prediction",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction successful", body = ApiResponse<PredictionResult>),
        (status = 422, description = "Prediction error", body = ApiResponse<()>),
        (status = 503, description = "Model assets not found", body = ApiResponse<()>),
    )
)]
pub async fn predict_handler(
    State(state): State<SharedState>,
    Json(req): Json<PredictRequest>,
) -> (StatusCode, Json<ApiResponse<PredictionResult>>) {
    let service = match state.service().await {
        Ok(service) => service,
        Err(err) => return json_error(&err),
    };

    match json_record(req.fields).and_then(|record| service.recommend(&record)) {
        Ok(rec) => (StatusCode::OK, Json(ApiResponse::success(rec.into()))),
        Err(err) => json_error(&err),
    }
}

/// List the role catalog
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "introspection",
    responses(
        (status = 200, description = "Role catalog", body = ApiResponse<RolesResult>),
    )
)]
pub async fn roles_handler(State(state): State<SharedState>) -> Json<ApiResponse<RolesResult>> {
    let roles: Vec<RoleEntry> = state
        .catalog()
        .iter()
        .map(|(name, info)| RoleEntry {
            name: name.to_string(),
            details: info.clone().into(),
        })
        .collect();

    Json(ApiResponse::success(RolesResult {
        count: roles.len(),
        roles,
    }))
}

/// Summary of the loaded model bundle
#[utoipa::path(
    get,
    path = "/api/model",
    tag = "introspection",
    responses(
        (status = 200, description = "Model summary", body = ApiResponse<ModelInfo>),
        (status = 503, description = "Model assets not found", body = ApiResponse<()>),
    )
)]
pub async fn model_handler(
    State(state): State<SharedState>,
) -> (StatusCode, Json<ApiResponse<ModelInfo>>) {
    let service = match state.service().await {
        Ok(service) => service,
        Err(err) => return json_error(&err),
    };

    let info = ModelInfo {
        n_features: service.n_features(),
        n_estimators: service.n_estimators(),
        classes: service.classes().to_vec(),
        feature_columns: service.pipeline().columns().names().to_vec(),
        manifest: service.manifest().map(ManifestInfo::from),
    };
    (StatusCode::OK, Json(ApiResponse::success(info)))
}

/// Health check endpoint for monitoring
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck),
    )
)]
pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_loaded: state.is_loaded(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_record_normalization() {
        let fields: BTreeMap<String, serde_json::Value> = serde_json::from_value(json!({
            "a": 80,
            "b": "Yes",
            "c": "python",
            "d": false,
            "e": "3.5"
        }))
        .unwrap();
        let record = json_record(fields).unwrap();
        assert_eq!(record.get("a"), Some(&FieldValue::Number(80.0)));
        assert_eq!(record.get("b"), Some(&FieldValue::Number(1.0)));
        assert_eq!(record.get("c"), Some(&FieldValue::Text("python".into())));
        assert_eq!(record.get("d"), Some(&FieldValue::Number(0.0)));
        assert_eq!(record.get("e"), Some(&FieldValue::Number(3.5)));
    }

    #[test]
    fn test_json_record_rejects_nested() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), json!([1, 2]));
        let err = json_record(fields).unwrap_err();
        assert!(err.is_feature_contract_error());
    }

    #[test]
    fn test_error_mapping() {
        let (status, err) = career_error_to_api(&CareerError::ArtifactNotFound("model.json".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message, ASSETS_MISSING_MESSAGE);

        let (status, err) = career_error_to_api(&CareerError::MissingField("x".into()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "Prediction Error: Missing field: 'x'. Please check inputs.");
    }
}
