//! Capability listing

use axum::Json;
use serde_json::{json, Value};

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Student Dropout Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/predict": "POST - Submit student data for prediction",
            "/health": "GET - Check API health"
        }
    }))
}
