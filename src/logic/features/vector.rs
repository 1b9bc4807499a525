//! Feature Vector - normalized classifier input

use serde::Serialize;

use crate::models::StudentInput;
use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_SCALES, FEATURE_VERSION};

/// Normalized features in the order defined by `FEATURE_LAYOUT`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub version: u8,
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from already-normalized values
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            values,
        }
    }

    /// Normalize raw student fields by their fixed scale constants
    pub fn from_input(input: &StudentInput) -> Self {
        let raw = [
            f64::from(input.age),
            input.attendance_percent,
            input.avg_marks,
            f64::from(input.prev_failures),
            f64::from(input.parents_education),
            input.family_income,
            f64::from(input.extracurricular),
            f64::from(input.behavior_issues),
        ];

        let mut values = [0.0; FEATURE_COUNT];
        for (i, (value, scale)) in raw.iter().zip(FEATURE_SCALES).enumerate() {
            values[i] = value / scale;
        }

        Self::from_values(values)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: serde_json::Map<String, serde_json::Value> = FEATURE_LAYOUT
            .iter()
            .zip(self.values)
            .map(|(name, v)| (name.to_string(), serde_json::json!(v)))
            .collect();

        serde_json::json!({
            "feature_version": self.version,
            "named_values": named,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> StudentInput {
        StudentInput {
            age: 20,
            attendance_percent: 85.0,
            avg_marks: 72.5,
            prev_failures: 1,
            parents_education: 7,
            family_income: 2.5,
            extracurricular: 4,
            behavior_issues: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalization_order_and_divisors() {
        let vector = FeatureVector::from_input(&sample_input());

        assert_eq!(
            vector.as_array(),
            &[20.0 / 100.0, 85.0 / 100.0, 72.5 / 100.0, 1.0 / 5.0, 7.0 / 7.0, 2.5 / 5.0, 4.0 / 10.0, 2.0 / 4.0]
        );
    }

    #[test]
    fn test_defaults_normalize_to_age_only() {
        let vector = FeatureVector::from_input(&StudentInput::default());
        assert_eq!(vector.values[0], 0.18);
        assert!(vector.values[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_values_are_not_clamped() {
        let input = StudentInput {
            attendance_percent: 150.0,
            behavior_issues: 8,
            ..Default::default()
        };
        let vector = FeatureVector::from_input(&input);
        assert_eq!(vector.values[1], 1.5);
        assert_eq!(vector.values[7], 2.0);
    }

    #[test]
    fn test_access_by_index_and_name() {
        let vector = FeatureVector::from_input(&sample_input());

        assert_eq!(vector.get(1), Some(0.85));
        assert_eq!(vector.get_by_name("attendance_percent"), Some(0.85));
        assert_eq!(vector.get_by_name("behavior_issues"), vector.get(7));
        assert_eq!(vector.get(FEATURE_COUNT), None);
        assert_eq!(vector.get_by_name("shoe_size"), None);
    }

    #[test]
    fn test_log_entry_names_every_feature() {
        let entry = FeatureVector::from_input(&sample_input()).to_log_entry();
        let named = entry["named_values"].as_object().unwrap();
        assert_eq!(named.len(), FEATURE_COUNT);
        assert_eq!(named["avg_marks"], 0.725);
        assert_eq!(entry["feature_version"], FEATURE_VERSION);
    }
}
