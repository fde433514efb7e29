//! Request guards: a global token bucket in front of every route except
//! `/health`, and the JSON body returned when a request exceeds its timeout.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

use crate::models::{ApiError, ApiResponse};

/// One bucket shared by all clients.
pub type AppRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token bucket settings; defaults are 10 req/s with bursts of 20.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Refill rate; 0 is treated as 1
    pub requests_per_second: u32,
    /// Bucket capacity; 0 is treated as 1
    pub burst_size: u32,
    /// `--no-rate-limit` or `CAREER_API_RATE_ENABLED=false` turns this off
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 20,
            enabled: true,
        }
    }
}

impl RateLimitConfig {
    /// Read `CAREER_API_RATE_LIMIT`, `CAREER_API_RATE_BURST` and
    /// `CAREER_API_RATE_ENABLED`; unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rps = std::env::var("CAREER_API_RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.requests_per_second);

        let burst = std::env::var("CAREER_API_RATE_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.burst_size);

        let enabled = std::env::var("CAREER_API_RATE_ENABLED")
            .map(|s| s != "false" && s != "0")
            .unwrap_or(defaults.enabled);

        Self {
            requests_per_second: rps,
            burst_size: burst,
            enabled,
        }
    }

    /// Build the shared bucket. governor rejects zero quotas, so zero
    /// settings are clamped to 1 instead of failing start-up.
    pub fn create_limiter(&self) -> Arc<AppRateLimiter> {
        let quota = Quota::per_second(NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN));

        Arc::new(RateLimiter::direct(quota))
    }
}

/// Reject with `429 RATE_LIMITED` once the bucket is empty. `/health`
/// bypasses the bucket so monitoring keeps working under load.
pub async fn rate_limit_middleware(
    State((limiter, config)): State<(Arc<AppRateLimiter>, RateLimitConfig)>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !config.enabled || request.uri().path() == "/health" {
        return next.run(request).await;
    }

    match limiter.check() {
        Ok(_) => next.run(request).await,
        Err(_) => {
            let error = ApiResponse::<()>::error(ApiError {
                code: "RATE_LIMITED".to_string(),
                message: "Too many requests".to_string(),
                help: Some(format!(
                    "Rate limit: {} requests/second, burst: {}",
                    config.requests_per_second, config.burst_size
                )),
            });
            (StatusCode::TOO_MANY_REQUESTS, Json(error)).into_response()
        }
    }
}

/// Map a `tower` timeout to `408 TIMEOUT`; any other layer error is a 500.
pub async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<ApiResponse<()>>) {
    let (status, code, message) = if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "TIMEOUT", "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            format!("Unhandled internal error: {err}"),
        )
    };

    (
        status,
        Json(ApiResponse::error(ApiError {
            code: code.to_string(),
            message,
            help: None,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_allows_burst_then_blocks() {
        let config = RateLimitConfig {
            requests_per_second: 1,
            burst_size: 2,
            enabled: true,
        };
        let limiter = config.create_limiter();
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[test]
    fn test_zero_quota_is_clamped() {
        let config = RateLimitConfig {
            requests_per_second: 0,
            burst_size: 0,
            enabled: true,
        };
        assert!(config.create_limiter().check().is_ok());
    }
}
