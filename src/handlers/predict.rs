//! Prediction handler

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use crate::{AppState, AppError, AppResult};
use crate::logic::{analysis, input, model, recommend};
use crate::logic::analysis::Analysis;
use crate::logic::features::FeatureVector;
use crate::models::{RiskLevel, StudentRecord};

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub risk: RiskLevel,
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub student: StudentRecord,
    pub analysis: Analysis,
}

/// Predict dropout risk for one student and record the request
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<PredictResponse>> {
    let student = input::parse_body(&body)?;
    tracing::debug!("Processed student data: {:?}", student);

    let classifier = state.model.as_deref().ok_or(AppError::ModelUnavailable)?;

    let features = FeatureVector::from_input(&student);
    tracing::debug!(features = %features.to_log_entry(), "Running prediction");

    let prediction = model::inference::run(classifier, &features)?;
    let recommendations = recommend::recommendations(&student, prediction.risk);
    let analysis = analysis::analyze(&student);

    let record = match state.store.insert(&student, prediction.risk).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Failed to store prediction ({}), returning unsaved record", e);
            StudentRecord::unpersisted(student, prediction.risk)
        }
    };

    tracing::info!(
        risk = %prediction.risk,
        confidence = prediction.confidence,
        stored = record.is_persisted(),
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        success: true,
        risk: prediction.risk,
        confidence: prediction.confidence,
        recommendations,
        student: record,
        analysis,
    }))
}
