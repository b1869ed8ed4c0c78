//! Quiz Risk Analytics Server
//!
//! Scores Moodle Adaptive Quiz attempts for student risk by forwarding the
//! CSV export to a language model and normalizing its answer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  QUIZ RISK ANALYTICS                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌─────────────┐  ┌───────────────────────┐ │
//! │  │  Router   │─►│ Normalizer  │─►│  Analyzer             │ │
//! │  │  (Axum)   │  │ (body→req)  │  │  dry-run | live       │ │
//! │  └───────────┘  └─────────────┘  └───────────┬───────────┘ │
//! │                                              ▼             │
//! │                                    ┌──────────────────┐    │
//! │                                    │ Model provider   │    │
//! │                                    │ (OpenAI)         │    │
//! │                                    └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod analysis;
mod config;
mod error;
mod handlers;
mod models;
mod provider;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::provider::{OpenAIClient, TextGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before logging so RUST_LOG / LOG_FORMAT can come from it
    dotenvy::dotenv().ok();
    init_tracing();

    let config = config::Config::from_env();

    tracing::info!("Quiz Risk Analytics starting...");
    tracing::info!("Model: {} (environment: {})", config.model, config.environment);

    let generator: Option<Arc<dyn TextGenerator>> = if config.has_credentials() {
        let client = OpenAIClient::new(&config)
            .context("failed to build model provider client")?;
        tracing::info!("Provider: {} (timeout {}s)", config.openai_base_url, config.request_timeout_secs);
        Some(Arc::new(client))
    } else {
        tracing::warn!("OPENAI_API_KEY not set, all requests will run in dry-run mode");
        None
    };

    if config.is_production() && config.debug_errors {
        tracing::warn!("DEBUG_ERRORS is on in production; error traces will be sent to clients");
    }

    let state = AppState {
        analyzer: Analyzer::new(generator, config.model.clone()),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await
        .context("server terminated")?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quiz_risk_analytics=debug,tower_http=debug".into());

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|f| f.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Moodle exports routinely exceed axum's 2 MB default
    let body_limit = match state.config.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/ping", get(handlers::health::ping).fallback(handlers::method_not_allowed))
        .route("/analyze", post(handlers::analyze::analyze).fallback(handlers::method_not_allowed))
        .fallback(handlers::not_found)
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
