//! Model discovery and loading at startup

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::fallback::RuleModel;
use super::forest::ForestModel;
use super::inference::{ModelError, RiskModel};

/// Searched in order when no explicit path is configured
pub const DEFAULT_MODEL_PATHS: &[&str] = &[
    "ml/models/dropout_model_v1.json",
    "models/dropout_model_v1.json",
    "dropout_model_v1.json",
];

/// Shared read-only model handle
pub type SharedModel = Arc<dyn RiskModel>;

/// Resolve and load the model for the process.
///
/// - a model file is found and valid: the forest model
/// - no file is found on the default paths: the fallback rule model
/// - an explicit path is missing, or a file cannot be loaded: `None`,
///   predictions will fail
pub fn load_model(explicit: Option<&str>) -> Option<SharedModel> {
    let path = match explicit {
        Some(path) => PathBuf::from(path),
        None => match DEFAULT_MODEL_PATHS.iter().map(PathBuf::from).find(|p| p.is_file()) {
            Some(path) => path,
            None => {
                tracing::warn!(
                    "Model file not found (searched {:?}), using fallback rule model",
                    DEFAULT_MODEL_PATHS
                );
                return Some(Arc::new(RuleModel));
            }
        },
    };

    match load_forest(&path) {
        Ok(model) => {
            tracing::info!(
                "Model loaded successfully from {} ({} trees)",
                path.display(),
                model.tree_count()
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::error!("Model loading failed for {}: {}", path.display(), e);
            None
        }
    }
}

/// Load a forest model file and record its checksum
pub fn load_forest(path: &Path) -> Result<ForestModel, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let checksum = format!("{:x}", Sha256::digest(&bytes));

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(ForestModel::from_json(&name, &bytes)?.with_checksum(checksum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::{fallback, forest};
    use std::io::Write;

    const STUMP: &str = r#"{
        "model_type": "random_forest",
        "trees": [ { "nodes": [
            { "feature": 1, "threshold": 0.75, "left": 1, "right": 2 },
            { "value": [1, 9] },
            { "value": [9, 1] }
        ] } ]
    }"#;

    #[test]
    fn test_loads_explicit_model_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(STUMP.as_bytes()).unwrap();

        let model = load_model(file.path().to_str()).expect("model should load");
        let info = model.describe();
        assert_eq!(info.kind, forest::MODEL_TYPE);
        assert_eq!(info.checksum.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn test_missing_explicit_path_leaves_no_model() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");

        assert!(load_model(missing.to_str()).is_none());
    }

    #[test]
    fn test_no_default_file_falls_back_to_rules() {
        if DEFAULT_MODEL_PATHS.iter().any(|p| Path::new(p).is_file()) {
            return;
        }

        let model = load_model(None).expect("fallback model");
        assert_eq!(model.describe().kind, fallback::MODEL_KIND);
    }

    #[test]
    fn test_corrupt_file_leaves_no_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ this is not a model").unwrap();

        assert!(load_model(file.path().to_str()).is_none());
    }

    #[test]
    fn test_load_forest_reports_missing_path() {
        let err = load_forest(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
    }

    #[test]
    fn test_checksum_is_stable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(STUMP.as_bytes()).unwrap();

        let a = load_forest(file.path()).unwrap().describe().checksum;
        let b = load_forest(file.path()).unwrap().describe().checksum;
        assert_eq!(a, b);
    }
}
