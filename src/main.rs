//! Student Dropout Risk API
//!
//! Predicts a student's dropout risk from demographic and behavioral
//! features and records every prediction request.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      DROPOUT RISK API                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /predict (Axum)                                        │
//! │    input ─► features ─► model ─► recommend / analysis        │
//! │                                        │                     │
//! │                                        ▼                     │
//! │                          StudentStore (best-effort)          │
//! │                          PostgreSQL │ in-memory              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod logic;
mod store;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
    http::{HeaderValue, Method, header::CONTENT_TYPE},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logic::model::SharedModel;
use store::{MemoryStudentStore, PgStudentStore, SharedStore, StudentStore};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(config.json_logs);

    tracing::info!("Dropout Risk API starting ({})", config.environment);

    // Model is loaded once and shared read-only
    let model = logic::model::load_model(config.model_path.as_deref());
    tracing::info!(
        "ML model status: {}",
        if model.is_some() { "loaded" } else { "not loaded" }
    );

    let store = connect_store(&config).await?;

    let state = AppState {
        model,
        store,
        config: config.clone(),
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dropout_risk_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_store(config: &config::Config) -> anyhow::Result<SharedStore> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory store, predictions are not kept across restarts");
        return Ok(Arc::new(MemoryStudentStore::new()));
    }

    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("failed to create database pool")?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let store = PgStudentStore::new(pool);
    match store.count().await {
        Ok(n) => tracing::info!("{} prediction records on file", n),
        Err(e) => tracing::warn!("Could not count prediction records: {}", e),
    }

    Ok(Arc::new(store))
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Option<SharedModel>,
    pub store: SharedStore,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::home::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &config::Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if config.allows_any_origin() {
        if config.is_production() {
            tracing::warn!("CORS allows any origin in production");
        }
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
