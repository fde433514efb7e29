//! Route configuration for the Career Compass API

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, SharedState};

/// Create the main application router
pub fn create_router() -> Router<SharedState> {
    Router::new()
        // Browser flow
        .route("/", get(handlers::index_handler))
        .route("/predict", post(handlers::predict_form_handler))

        // JSON API
        .route("/api/predict", post(handlers::predict_handler))
        .route("/api/roles", get(handlers::roles_handler))
        .route("/api/model", get(handlers::model_handler))

        // Health check
        .route("/health", get(handlers::health_handler))
}
