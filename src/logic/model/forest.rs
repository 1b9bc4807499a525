//! Forest Model - tree ensemble exported from the offline training job
//!
//! File format (JSON):
//!
//! ```json
//! {
//!   "model_type": "random_forest",
//!   "feature_names": ["age", "attendance_percent", ...],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 1, "threshold": 0.7, "left": 1, "right": 2 },
//!         { "value": [12.0, 30.0] },
//!         { "value": [40.0, 3.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Split nodes send a sample left when `x[feature] <= threshold`. Leaf values
//! are per-class sample counts (or fractions); they are normalized per leaf.

use serde::Deserialize;

use crate::logic::features::{layout::matches_layout, FeatureVector, FEATURE_COUNT};
use super::inference::{ModelError, ModelInfo, RiskModel};

pub const MODEL_TYPE: &str = "random_forest";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: [f64; 2],
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
struct ForestFile {
    model_type: String,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone)]
pub struct ForestModel {
    name: String,
    checksum: Option<String>,
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Parse and validate a model file's contents
    pub fn from_json(name: &str, bytes: &[u8]) -> Result<Self, ModelError> {
        let file: ForestFile = serde_json::from_slice(bytes)?;

        if file.model_type != MODEL_TYPE {
            return Err(ModelError::Invalid(format!(
                "unsupported model_type '{}', expected '{}'",
                file.model_type, MODEL_TYPE
            )));
        }

        if let Some(names) = &file.feature_names {
            if !matches_layout(names) {
                return Err(ModelError::Invalid(format!(
                    "feature layout mismatch: model has {:?}",
                    names
                )));
            }
        }

        Self::from_trees(name, file.trees)
    }

    pub fn from_trees(name: &str, trees: Vec<Tree>) -> Result<Self, ModelError> {
        if trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".into()));
        }

        for (t, tree) in trees.iter().enumerate() {
            validate_tree(tree).map_err(|e| ModelError::Invalid(format!("tree {}: {}", t, e)))?;
        }

        Ok(Self {
            name: name.to_string(),
            checksum: None,
            trees,
        })
    }

    pub fn with_checksum(mut self, checksum: String) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

fn validate_tree(tree: &Tree) -> Result<(), String> {
    if tree.nodes.is_empty() {
        return Err("no nodes".into());
    }

    let n = tree.nodes.len();
    for (i, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split { feature, threshold, left, right } => {
                if *feature >= FEATURE_COUNT {
                    return Err(format!("node {} splits on feature {} (max {})", i, feature, FEATURE_COUNT - 1));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {} has a non-finite threshold", i));
                }
                if *left >= n || *right >= n {
                    return Err(format!("node {} has a child out of range", i));
                }
            }
            TreeNode::Leaf { value } => {
                let total: f64 = value.iter().sum();
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) || !total.is_finite() || total <= 0.0 {
                    return Err(format!("node {} has an invalid class distribution", i));
                }
            }
        }
    }

    Ok(())
}

/// Walk one tree to its leaf distribution, normalized to sum to 1
fn leaf_proba(tree: &Tree, x: &[f64; FEATURE_COUNT]) -> Result<[f64; 2], ModelError> {
    let mut index = 0;

    // a well-formed tree reaches a leaf in fewer steps than it has nodes
    for _ in 0..tree.nodes.len() {
        match &tree.nodes[index] {
            TreeNode::Split { feature, threshold, left, right } => {
                index = if x[*feature] <= *threshold { *left } else { *right };
            }
            TreeNode::Leaf { value } => {
                let total = value[0] + value[1];
                return Ok([value[0] / total, value[1] / total]);
            }
        }
    }

    Err(ModelError::Inference("tree traversal did not reach a leaf".into()))
}

impl RiskModel for ForestModel {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        let [low, high] = self.predict_proba(features)?;
        Ok(if high > low { 1 } else { 0 })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        let x = features.as_array();
        let mut sum = [0.0; 2];

        for tree in &self.trees {
            let p = leaf_proba(tree, x)?;
            sum[0] += p[0];
            sum[1] += p[1];
        }

        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            name: self.name.clone(),
            kind: MODEL_TYPE,
            checksum: self.checksum.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split { feature, threshold, left: 1, right: 2 },
                TreeNode::Leaf { value: left },
                TreeNode::Leaf { value: right },
            ],
        }
    }

    fn vector(attendance: f64, marks: f64) -> FeatureVector {
        FeatureVector::from_values([0.18, attendance, marks, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_single_tree_goes_left_on_equal() {
        let model = ForestModel::from_trees("t", vec![stump(1, 0.7, [1.0, 3.0], [4.0, 0.0])]).unwrap();

        assert_eq!(model.predict_proba(&vector(0.7, 0.5)).unwrap(), [0.25, 0.75]);
        assert_eq!(model.predict(&vector(0.7, 0.5)).unwrap(), 1);
        assert_eq!(model.predict(&vector(0.71, 0.5)).unwrap(), 0);
    }

    #[test]
    fn test_forest_averages_trees() {
        let model = ForestModel::from_trees(
            "t",
            vec![
                stump(1, 0.7, [0.0, 1.0], [1.0, 0.0]),
                stump(2, 0.6, [0.0, 1.0], [1.0, 0.0]),
            ],
        )
        .unwrap();

        // low attendance, good marks: trees disagree
        let proba = model.predict_proba(&vector(0.5, 0.9)).unwrap();
        assert_eq!(proba, [0.5, 0.5]);
        // ties resolve to low risk
        assert_eq!(model.predict(&vector(0.5, 0.9)).unwrap(), 0);

        assert_eq!(model.predict(&vector(0.5, 0.4)).unwrap(), 1);
    }

    #[test]
    fn test_from_json() {
        let json = br#"{
            "model_type": "random_forest",
            "feature_names": ["age", "attendance_percent", "avg_marks", "prev_failures",
                              "parents_education", "family_income", "extracurricular", "behavior_issues"],
            "trees": [
                { "nodes": [
                    { "feature": 2, "threshold": 0.6, "left": 1, "right": 2 },
                    { "value": [10, 30] },
                    { "value": [45, 5] }
                ] }
            ]
        }"#;

        let model = ForestModel::from_json("dropout_model_v1.json", json).unwrap();
        assert_eq!(model.tree_count(), 1);
        assert_eq!(model.predict(&vector(0.9, 0.5)).unwrap(), 1);
        assert_eq!(model.predict_proba(&vector(0.9, 0.8)).unwrap(), [0.9, 0.1]);
        assert_eq!(model.describe().kind, MODEL_TYPE);
    }

    #[test]
    fn test_rejects_layout_mismatch() {
        let json = br#"{ "model_type": "random_forest", "feature_names": ["age"],
                        "trees": [ { "nodes": [ { "value": [1, 1] } ] } ] }"#;
        assert!(matches!(ForestModel::from_json("m", json), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_wrong_model_type() {
        let json = br#"{ "model_type": "svm", "trees": [ { "nodes": [ { "value": [1, 1] } ] } ] }"#;
        assert!(matches!(ForestModel::from_json("m", json), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_trees() {
        let out_of_range = Tree {
            nodes: vec![TreeNode::Split { feature: 8, threshold: 0.5, left: 0, right: 0 }],
        };
        assert!(ForestModel::from_trees("m", vec![out_of_range]).is_err());

        let dangling = Tree {
            nodes: vec![TreeNode::Split { feature: 1, threshold: 0.5, left: 1, right: 5 }],
        };
        assert!(ForestModel::from_trees("m", vec![dangling]).is_err());

        let empty_leaf = Tree { nodes: vec![TreeNode::Leaf { value: [0.0, 0.0] }] };
        assert!(ForestModel::from_trees("m", vec![empty_leaf]).is_err());

        let overflowing_leaf = Tree { nodes: vec![TreeNode::Leaf { value: [1e308, 1e308] }] };
        assert!(matches!(
            ForestModel::from_trees("m", vec![overflowing_leaf]),
            Err(ModelError::Invalid(_))
        ));

        assert!(ForestModel::from_trees("m", vec![]).is_err());
    }

    #[test]
    fn test_cyclic_tree_fails_instead_of_hanging() {
        let cyclic = Tree {
            nodes: vec![
                TreeNode::Split { feature: 1, threshold: 0.5, left: 1, right: 1 },
                TreeNode::Split { feature: 1, threshold: 0.5, left: 0, right: 0 },
            ],
        };
        let model = ForestModel::from_trees("m", vec![cyclic]).unwrap();
        assert!(matches!(
            model.predict(&vector(0.1, 0.1)),
            Err(ModelError::Inference(_))
        ));
    }
}
