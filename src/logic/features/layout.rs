//! Feature Layout - Centralized Feature Definition
//!
//! Order and scale of every feature the classifier consumes.
//! Model files are checked against [`FEATURE_LAYOUT`] at load time, so a
//! change here must bump [`FEATURE_VERSION`] and go out with retrained weights.

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",                   // 0
    "attendance_percent",    // 1
    "avg_marks",             // 2
    "prev_failures",         // 3
    "parents_education",     // 4
    "family_income",         // 5
    "extracurricular",       // 6
    "behavior_issues",       // 7
];

/// Divisor applied to each raw field, same order as [`FEATURE_LAYOUT`]
pub const FEATURE_SCALES: [f64; FEATURE_COUNT] = [
    100.0, // age
    100.0, // attendance_percent
    100.0, // avg_marks
    5.0,   // prev_failures
    7.0,   // parents_education
    5.0,   // family_income
    10.0,  // extracurricular
    4.0,   // behavior_issues
];

/// Total number of features
pub const FEATURE_COUNT: usize = 8;

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Check that an externally declared layout matches ours exactly
pub fn matches_layout(names: &[String]) -> bool {
    names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_and_count_agree() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_SCALES.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("age"), Some(0));
        assert_eq!(feature_index("attendance_percent"), Some(1));
        assert_eq!(feature_index("behavior_issues"), Some(7));
        assert_eq!(feature_index("shoe_size"), None);
    }

    #[test]
    fn test_matches_layout() {
        let names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert!(matches_layout(&names));

        let mut swapped = names.clone();
        swapped.swap(1, 2);
        assert!(!matches_layout(&swapped));
        assert!(!matches_layout(&names[..7]));
    }
}
