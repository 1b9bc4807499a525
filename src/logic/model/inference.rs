//! Inference - model trait and confidence derivation

use serde::Serialize;

use crate::logic::features::FeatureVector;
use crate::models::RiskLevel;

/// Confidence reported when the model cannot estimate probabilities
pub const FALLBACK_CONFIDENCE: f64 = 75.0;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model file not found: {0}")]
    NotFound(String),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("model does not support probability estimates")]
    ProbabilityUnsupported,

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Identification of a loaded model, for `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// A pre-trained binary classifier over the normalized feature vector.
///
/// Label 1 is high dropout risk. Implementations are read-only once built and
/// shared across requests.
pub trait RiskModel: Send + Sync {
    /// Predicted class label (0 = low, 1 = high)
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError>;

    /// Per-class probabilities `[p_low, p_high]`, if the model supports them
    fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        Err(ModelError::ProbabilityUnsupported)
    }

    /// Name, kind and checksum for status reporting
    fn describe(&self) -> ModelInfo;
}

/// Outcome of running one feature vector through the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub risk: RiskLevel,
    /// Percentage in [0, 100], one decimal place
    pub confidence: f64,
}

/// Classify and derive a confidence percentage.
///
/// A failing `predict` is an error; a failing or unsupported
/// `predict_proba` only degrades the confidence to [`FALLBACK_CONFIDENCE`].
pub fn run(model: &dyn RiskModel, features: &FeatureVector) -> Result<Prediction, ModelError> {
    let label = model.predict(features)?;

    let confidence = match model.predict_proba(features) {
        Ok(proba) => confidence_from(&proba),
        Err(e) => {
            tracing::debug!("No probability estimate ({}), using fallback confidence", e);
            FALLBACK_CONFIDENCE
        }
    };

    Ok(Prediction {
        risk: RiskLevel::from_label(label),
        confidence,
    })
}

/// Max class probability as a percentage, rounded to one decimal
pub fn confidence_from(proba: &[f64]) -> f64 {
    let best = proba
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .fold(f64::NAN, f64::max);

    if best.is_nan() {
        return FALLBACK_CONFIDENCE;
    }

    round1((best * 100.0).clamp(0.0, 100.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
