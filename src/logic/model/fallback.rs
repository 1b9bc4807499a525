//! Fallback rule model, used when no trained model file is available

use crate::logic::features::FeatureVector;
use super::inference::{ModelError, ModelInfo, RiskModel};

pub const MODEL_KIND: &str = "rule_fallback";

/// Normalized attendance below which a student is at risk
const ATTENDANCE_CUTOFF: f64 = 0.7;

/// Normalized marks below which a student is at risk
const MARKS_CUTOFF: f64 = 0.6;

/// High risk when both attendance and marks are low.
/// Has no probability estimates.
#[derive(Debug, Clone, Default)]
pub struct RuleModel;

impl RiskModel for RuleModel {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        let attendance = feature(features, "attendance_percent")?;
        let marks = feature(features, "avg_marks")?;
        Ok(u8::from(attendance < ATTENDANCE_CUTOFF && marks < MARKS_CUTOFF))
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            name: "attendance-and-marks rule".to_string(),
            kind: MODEL_KIND,
            checksum: None,
        }
    }
}

fn feature(features: &FeatureVector, name: &str) -> Result<f64, ModelError> {
    features
        .get_by_name(name)
        .ok_or_else(|| ModelError::Inference(format!("feature '{}' missing from layout", name)))
}
