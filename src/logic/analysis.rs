//! Status labels summarizing the raw fields

use serde::Serialize;

use crate::models::StudentInput;

const GOOD: &str = "Good";
const NEEDS_IMPROVEMENT: &str = "Needs Improvement";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub attendance_status: &'static str,
    pub academic_status: &'static str,
    pub engagement_level: &'static str,
}

pub fn analyze(student: &StudentInput) -> Analysis {
    Analysis {
        attendance_status: if student.attendance_percent >= 75.0 { GOOD } else { NEEDS_IMPROVEMENT },
        academic_status: if student.avg_marks >= 60.0 { GOOD } else { NEEDS_IMPROVEMENT },
        engagement_level: if student.extracurricular > 2 { "High" } else { "Low" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let student = StudentInput {
            attendance_percent: 75.0,
            avg_marks: 59.9,
            extracurricular: 3,
            ..Default::default()
        };

        let analysis = analyze(&student);
        assert_eq!(analysis.attendance_status, "Good");
        assert_eq!(analysis.academic_status, "Needs Improvement");
        assert_eq!(analysis.engagement_level, "High");
    }

    #[test]
    fn test_defaults_need_improvement() {
        let analysis = analyze(&StudentInput::default());
        assert_eq!(analysis.attendance_status, "Needs Improvement");
        assert_eq!(analysis.academic_status, "Needs Improvement");
        assert_eq!(analysis.engagement_level, "Low");
    }
}
