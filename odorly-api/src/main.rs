//! Odor.ly REST API Server
//!
//! Serves the simulated body odor telemetry, controls the geiger click
//! scheduler, and proxies odor commentary requests to Gemini.
//!
//! ## Features
//! - Client-free telemetry: a background task drives the simulator
//! - Rate Limiting (configurable requests per second)
//! - OpenAPI document at /api-docs/openapi.json
//!
//! ## Environment Variables
//! - `ODORLY_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `ODORLY_API_PORT`: Port to listen on (default: 3000)
//! - `ODORLY_API_RATE_LIMIT`: Requests per second (default: 10)
//! - `ODORLY_API_RATE_BURST`: Burst size (default: 20)
//! - `ODORLY_API_RATE_ENABLED`: Enable rate limiting (default: true)
//! - `GEMINI_API_KEY`: Gemini API key (no key = /odor returns 500)
//! - `GEMINI_MODEL`: Upstream model name (default: gemini-1.5-flash)

pub mod gemini;
pub mod handlers;
pub mod middleware;
pub mod models;
mod openapi;
mod routes;
mod state;
mod telemetry;

use axum::middleware as axum_middleware;
use clap::Parser;
use odorly_core::EntropySource;
use odorly_geiger::GeigerScheduler;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemini::{CommentBackend, GeminiClient};
use middleware::{rate_limit_middleware, RateLimitConfig};
use state::AppState;
use telemetry::{sample_period, TelemetryHandle};

#[derive(Parser)]
#[command(name = "odorly-api")]
#[command(author = "Odorly Contributors")]
#[command(version)]
#[command(about = "REST API server for the Odor.ly dashboard", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ODORLY_API_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "ODORLY_API_PORT")]
    port: u16,

    /// Enable CORS for all origins
    #[arg(long, default_value_t = false)]
    cors: bool,

    /// Disable rate limiting
    #[arg(long, default_value_t = false)]
    no_rate_limit: bool,

    /// Seed for the telemetry noise source (omit for entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Override the sampling period in milliseconds (default: 2000-2600, drawn once)
    #[arg(long)]
    period_ms: Option<u64>,

    /// Start the geiger click scheduler at boot
    #[arg(long, default_value_t = false)]
    geiger: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "odorly_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configurations from environment
    let mut rate_config = RateLimitConfig::from_env();
    if args.no_rate_limit {
        rate_config.enabled = false;
    }
    let rate_limiter = rate_config.create_limiter();

    let backend: Option<Arc<dyn CommentBackend>> = GeminiClient::from_env()
        .map(|client| Arc::new(client) as Arc<dyn CommentBackend>);

    // Build the telemetry runtime and geiger scheduler
    let telemetry = TelemetryHandle::new(args.seed);
    let period = match args.period_ms {
        Some(ms) => Duration::from_millis(ms.max(1)),
        None => sample_period(&mut EntropySource::new()),
    };
    telemetry.start_sampling(period).await;

    let mut geiger = GeigerScheduler::new(telemetry.probability_feed());
    if args.geiger {
        geiger.start();
    }

    let state = AppState::new(telemetry.clone(), geiger, backend.clone());

    // Build router with API routes
    let mut app = routes::create_router(state.clone());

    // Add rate limiting middleware
    app = app.layer(axum_middleware::from_fn_with_state(
        (rate_limiter.clone(), rate_config.clone()),
        rate_limit_middleware,
    ));

    // Add CORS if enabled
    if args.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    // Add tracing layer
    app = app.layer(TraceLayer::new_for_http());

    // Parse address
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .expect("Invalid address");

    tracing::info!("Odor.ly API server starting on http://{}", addr);
    tracing::info!("Sampling period: {:?}", period);
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /odor?bo=N        - AI-generated odor comment");
    tracing::info!("  GET  /api/telemetry    - Current sensor state");
    tracing::info!("  GET  /api/log          - Recent log entries");
    tracing::info!("  GET  /api/export       - Full log as CSV");
    tracing::info!("  POST /api/spritz       - Deploy an artificial odor cloud");
    tracing::info!("  POST /api/probability  - Nudge the odor probability");
    tracing::info!("  GET  /api/geiger       - Click scheduler status");
    tracing::info!("  POST /api/geiger/start - Start the click scheduler");
    tracing::info!("  POST /api/geiger/stop  - Stop the click scheduler");
    tracing::info!("  GET  /health           - Health check");
    tracing::info!("");
    tracing::info!("Configuration:");
    tracing::info!(
        "  Comment backend: {}",
        if backend.is_some() {
            "Gemini (key configured)"
        } else {
            "disabled (set GEMINI_API_KEY)"
        }
    );
    tracing::info!(
        "  Rate limiting: {}",
        if rate_config.enabled {
            format!(
                "{} req/s (burst: {})",
                rate_config.requests_per_second, rate_config.burst_size
            )
        } else {
            "disabled".to_string()
        }
    );
    tracing::info!(
        "  Geiger scheduler: {}",
        if args.geiger { "started" } else { "stopped" }
    );

    // Start server, tearing the background tasks down on Ctrl-C
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    telemetry.shutdown().await;
    state.geiger.lock().await.stop();
    tracing::info!("Odor.ly API server stopped");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
}
