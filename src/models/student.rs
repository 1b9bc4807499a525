//! Student model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};

/// Placeholder name when the request carries none
pub const DEFAULT_NAME: &str = "Student";

/// Placeholder gender when the request carries none
pub const DEFAULT_GENDER: &str = "Unknown";

/// Width of the `name` column
pub const NAME_MAX_LEN: usize = 100;

/// Width of the `gender` column
pub const GENDER_MAX_LEN: usize = 20;

/// Age assumed when the request omits it
pub const DEFAULT_AGE: i32 = 18;

/// Predicted dropout risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Map a classifier label (1 = high risk) to a risk level
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Low => "Low",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown risk level '{0}'")]
pub struct UnknownRiskLevel(String);

impl TryFrom<String> for RiskLevel {
    type Error = UnknownRiskLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "High" => Ok(RiskLevel::High),
            "Low" => Ok(RiskLevel::Low),
            _ => Err(UnknownRiskLevel(value)),
        }
    }
}

/// Coerced request fields, before prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentInput {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub attendance_percent: f64,
    pub avg_marks: f64,
    pub prev_failures: i32,
    pub parents_education: i32,
    pub family_income: f64,
    pub extracurricular: i32,
    pub behavior_issues: i32,
}

impl Default for StudentInput {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            age: DEFAULT_AGE,
            gender: DEFAULT_GENDER.to_string(),
            attendance_percent: 0.0,
            avg_marks: 0.0,
            prev_failures: 0,
            parents_education: 0,
            family_income: 0.0,
            extracurricular: 0,
            behavior_issues: 0,
        }
    }
}

/// A prediction request as stored (or as returned when storing failed)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub attendance_percent: f64,
    pub avg_marks: f64,
    pub prev_failures: i32,
    pub parents_education: i32,
    pub family_income: f64,
    pub extracurricular: i32,
    pub behavior_issues: i32,
    #[sqlx(try_from = "String")]
    pub predicted_risk: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StudentRecord {
    /// Build a record that has not been written anywhere
    pub fn unpersisted(input: StudentInput, predicted_risk: RiskLevel) -> Self {
        Self {
            id: None,
            name: input.name,
            age: input.age,
            gender: input.gender,
            attendance_percent: input.attendance_percent,
            avg_marks: input.avg_marks,
            prev_failures: input.prev_failures,
            parents_education: input.parents_education,
            family_income: input.family_income,
            extracurricular: input.extracurricular,
            behavior_issues: input.behavior_issues,
            predicted_risk,
            created_at: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub async fn insert(
        pool: &PgPool,
        input: &StudentInput,
        predicted_risk: RiskLevel,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, StudentRecord>(
            r#"
            INSERT INTO students (name, age, gender, attendance_percent, avg_marks, prev_failures,
                                  parents_education, family_income, extracurricular, behavior_issues,
                                  predicted_risk)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(input.attendance_percent)
        .bind(input.avg_marks)
        .bind(input.prev_failures)
        .bind(input.parents_education)
        .bind(input.family_income)
        .bind(input.extracurricular)
        .bind(input.behavior_issues)
        .bind(predicted_risk.as_str())
        .fetch_one(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(RiskLevel::from_label(1), RiskLevel::High);
        assert_eq!(RiskLevel::from_label(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_label(7), RiskLevel::Low);
    }

    #[test]
    fn test_risk_level_parses_stored_value() {
        assert_eq!(RiskLevel::try_from("High".to_string()).unwrap(), RiskLevel::High);
        assert!(RiskLevel::try_from("high".to_string()).is_err());
    }

    #[test]
    fn test_unpersisted_record_omits_id_and_timestamp() {
        let record = StudentRecord::unpersisted(StudentInput::default(), RiskLevel::Low);
        assert!(!record.is_persisted());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["predicted_risk"], "Low");
        assert_eq!(json["age"], 18);
        assert_eq!(json["name"], "Student");
        assert_eq!(json["gender"], "Unknown");
    }
}
