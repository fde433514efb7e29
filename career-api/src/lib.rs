//! Career Compass HTTP service
//!
//! Serves the recommendation form, returns the PDF report, and exposes the
//! same prediction as JSON.
//!
//! ## Endpoints
//! - `GET  /`            - recommendation form
//! - `POST /predict`     - form submission, PDF download or HTML error page
//! - `POST /api/predict` - JSON prediction
//! - `GET  /api/roles`   - role catalog
//! - `GET  /api/model`   - loaded model summary
//! - `GET  /health`      - health check
//! - `GET  /docs`        - Swagger UI

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod templates;

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::middleware as axum_middleware;
use axum::Router;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use handlers::SharedState;
pub use middleware::RateLimitConfig;
pub use state::AppState;

use middleware::{handle_timeout_error, rate_limit_middleware};
use openapi::ApiDoc;

/// Router-level settings
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub cors: bool,
    pub rate_limit: RateLimitConfig,
    pub request_timeout: Duration,
    /// Maximum request body size in bytes
    pub body_limit: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            cors: false,
            rate_limit: RateLimitConfig::default(),
            request_timeout: Duration::from_secs(30),
            body_limit: 64 * 1024,
        }
    }
}

/// Build the complete application router
pub fn app(state: Arc<AppState>, options: &ServerOptions) -> Router {
    let limiter = options.rate_limit.create_limiter();

    let mut app = routes::create_router()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    app = app.layer(axum_middleware::from_fn_with_state(
        (limiter, options.rate_limit.clone()),
        rate_limit_middleware,
    ));

    app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .layer(TimeoutLayer::new(options.request_timeout)),
    );

    app = app.layer(RequestBodyLimitLayer::new(options.body_limit));

    if options.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}
