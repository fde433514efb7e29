//! Career Compass API Server
//!
//! ## Environment Variables
//! - `CAREER_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `CAREER_API_PORT`: Port to listen on (default: 5000)
//! - `CAREER_ARTIFACTS`: Model bundle directory (default: `[artifacts] dir`)
//! - `CAREER_CONFIG`: Path to `career.toml`
//! - `CAREER_API_RATE_LIMIT`: Requests per second (default: 10)
//! - `CAREER_API_RATE_BURST`: Burst size (default: 20)
//! - `CAREER_API_RATE_ENABLED`: Enable rate limiting (default: true)

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use career_api::{app, AppState, RateLimitConfig, ServerOptions};
use career_core::CareerConfig;

#[derive(Parser)]
#[command(name = "career-api")]
#[command(author = "Career Compass Contributors")]
#[command(version)]
#[command(about = "HTTP server for career role recommendations", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "CAREER_API_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000, env = "CAREER_API_PORT")]
    port: u16,

    /// Model bundle directory
    #[arg(short, long, env = "CAREER_ARTIFACTS")]
    artifacts: Option<PathBuf>,

    /// Configuration file (career.toml)
    #[arg(short, long, env = "CAREER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable CORS for all origins
    #[arg(long, default_value_t = false)]
    cors: bool,

    /// Disable rate limiting
    #[arg(long, default_value_t = false)]
    no_rate_limit: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "career_api=info,career_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = CareerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let state = Arc::new(AppState::new(config, args.artifacts).context("failed to load role catalog")?);

    // First load attempt; requests retry until one succeeds
    if let Err(err) = state.service().await {
        tracing::warn!("Model not loaded yet ({}); predictions will retry on each request", err);
    }

    let mut rate_limit = RateLimitConfig::from_env();
    if args.no_rate_limit {
        rate_limit.enabled = false;
    }

    let options = ServerOptions {
        cors: args.cors,
        rate_limit,
        request_timeout: Duration::from_secs(args.timeout),
        ..ServerOptions::default()
    };
    let router = app(state.clone(), &options);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid address {}:{}", args.host, args.port))?;

    tracing::info!("Career Compass server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /            - Recommendation form");
    tracing::info!("  POST /predict     - Form submission, returns PDF report");
    tracing::info!("  POST /api/predict - JSON prediction");
    tracing::info!("  GET  /api/roles   - Role catalog");
    tracing::info!("  GET  /api/model   - Model summary");
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  GET  /docs        - Swagger UI");
    tracing::info!("");
    tracing::info!("Configuration:");
    tracing::info!("  Artifacts: {}", state.artifacts_dir().display());
    tracing::info!("  Roles in catalog: {}", state.catalog().len());
    tracing::info!(
        "  Rate limiting: {}",
        if options.rate_limit.enabled {
            format!(
                "{} req/s (burst: {})",
                options.rate_limit.requests_per_second, options.rate_limit.burst_size
            )
        } else {
            "disabled".to_string()
        }
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
