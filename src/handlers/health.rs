//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::logic::model::ModelInfo;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    database_connected: bool,
    model: Option<ModelInfo>,
    storage: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_connected = state.store.ping().await;
    if !database_connected {
        tracing::warn!("Health check: {} store is not reachable", state.store.name());
    }

    Json(HealthResponse {
        status: "running",
        model_loaded: state.model.is_some(),
        database_connected,
        model: state.model.as_ref().map(|m| m.describe()),
        storage: state.store.name(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
