//! OpenAPI documentation configuration

use utoipa::OpenApi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Career Compass API",
        version = "2026.10.16",
        description = "Career role recommendation - submit academic and interest fields, receive a predicted role with reference details",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Career Compass Contributors")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    tags(
        (name = "web", description = "HTML form and PDF report download"),
        (name = "prediction", description = "JSON role prediction"),
        (name = "introspection", description = "Role catalog and model information"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        handlers::index_handler,
        handlers::predict_form_handler,
        handlers::predict_handler,
        handlers::roles_handler,
        handlers::model_handler,
        handlers::health_handler,
    ),
    components(
        schemas(
            PredictRequest,
            ApiError,
            RoleDetails,
            PredictionResult,
            RoleEntry,
            RolesResult,
            ManifestInfo,
            ModelInfo,
            HealthCheck,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_endpoints() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/predict", "/api/predict", "/api/roles", "/api/model", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
