//! Recommendation rules
//!
//! Ordered rule table over the raw (non-normalized) fields. Every rule is
//! evaluated; output order is table order.

use crate::models::{RiskLevel, StudentInput};

pub const ATTENDANCE_MESSAGE: &str = "Improve attendance - aim for 80%+ attendance";
pub const ACADEMIC_MESSAGE: &str = "Focus on academic improvement - seek tutoring support";
pub const COUNSELING_MESSAGE: &str = "Address previous academic challenges with counselor";
pub const ENGAGEMENT_MESSAGE: &str = "Engage in extracurricular activities for better school connection";
pub const BEHAVIOR_MESSAGE: &str = "Work with counselors on behavioral support strategies";
pub const CHECK_IN_MESSAGE: &str = "Schedule regular check-ins with academic advisor";
pub const POSITIVE_MESSAGE: &str = "Continue current positive academic trajectory";

struct Rule {
    applies: fn(&StudentInput) -> bool,
    message: &'static str,
}

const FIELD_RULES: &[Rule] = &[
    Rule { applies: |s| s.attendance_percent < 75.0, message: ATTENDANCE_MESSAGE },
    Rule { applies: |s| s.avg_marks < 60.0, message: ACADEMIC_MESSAGE },
    Rule { applies: |s| s.prev_failures > 0, message: COUNSELING_MESSAGE },
    Rule { applies: |s| s.extracurricular == 0, message: ENGAGEMENT_MESSAGE },
    Rule { applies: |s| s.behavior_issues > 2, message: BEHAVIOR_MESSAGE },
];

pub fn recommendations(student: &StudentInput, risk: RiskLevel) -> Vec<String> {
    let mut out: Vec<String> = FIELD_RULES
        .iter()
        .filter(|rule| (rule.applies)(student))
        .map(|rule| rule.message.to_string())
        .collect();

    match risk {
        RiskLevel::High if out.is_empty() => out.push(CHECK_IN_MESSAGE.to_string()),
        RiskLevel::High => {}
        RiskLevel::Low => out.push(POSITIVE_MESSAGE.to_string()),
    }

    out
}
