//! Request Input Coercion
//!
//! Turns the raw JSON body of a prediction request into a [`StudentInput`].
//! Missing fields take their defaults; present fields must convert cleanly.
//! Ordinal fields also accept the labels used by the assessment form.

use serde_json::{Map, Value};

use crate::models::{StudentInput, DEFAULT_GENDER, DEFAULT_NAME, GENDER_MAX_LEN, NAME_MAX_LEN};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("No input data provided")]
    Empty,

    #[error("invalid JSON body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Label tables: (label, code)
const FAILURE_LABELS: &[(&str, i32)] = &[
    ("none", 0), ("one", 1), ("two", 2), ("multiple", 3),
];

const EDUCATION_LABELS: &[(&str, i32)] = &[
    ("no-formal", 0), ("primary", 1), ("secondary", 2), ("high-school", 3),
    ("diploma", 4), ("bachelor", 5), ("master", 6), ("phd", 7),
];

const INCOME_LABELS: &[(&str, i32)] = &[
    ("below-10k", 0), ("10k-25k", 1), ("25k-50k", 2),
    ("50k-75k", 3), ("75k-100k", 4), ("above-100k", 5),
];

const BEHAVIOR_LABELS: &[(&str, i32)] = &[
    ("excellent", 0), ("good", 1), ("average", 2), ("concerning", 3), ("severe", 4),
];

/// Parse a raw request body
pub fn parse_body(body: &[u8]) -> Result<StudentInput, InputError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(InputError::Empty);
    }

    let value: Value = serde_json::from_slice(body)?;
    from_value(&value)
}

/// Coerce an already-parsed JSON value
pub fn from_value(value: &Value) -> Result<StudentInput, InputError> {
    if is_empty(value) {
        return Err(InputError::Empty);
    }

    let map = value.as_object().ok_or(InputError::NotAnObject)?;
    let defaults = StudentInput::default();

    Ok(StudentInput {
        name: text_field(map, "name", DEFAULT_NAME, NAME_MAX_LEN),
        age: int_field(map, "age", defaults.age, &[])?,
        gender: text_field(map, "gender", DEFAULT_GENDER, GENDER_MAX_LEN),
        attendance_percent: float_field(map, "attendance_percent", &[])?,
        avg_marks: float_field(map, "avg_marks", &[])?,
        prev_failures: int_field(map, "prev_failures", 0, FAILURE_LABELS)?,
        parents_education: int_field(map, "parents_education", 0, EDUCATION_LABELS)?,
        family_income: float_field(map, "family_income", INCOME_LABELS)?,
        extracurricular: activity_count(map)?,
        behavior_issues: int_field(map, "behavior_issues", 0, BEHAVIOR_LABELS)?,
    })
}

/// Values that carry no data at all
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Free text, cut to `max_len` characters to fit its column
fn text_field(map: &Map<String, Value>, field: &str, default: &str, max_len: usize) -> String {
    match map.get(field).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => s.chars().take(max_len).collect::<String>().trim_end().to_string(),
        _ => default.to_string(),
    }
}

fn int_field(
    map: &Map<String, Value>,
    field: &'static str,
    default: i32,
    labels: &[(&str, i32)],
) -> Result<i32, InputError> {
    match map.get(field) {
        None => Ok(default),
        Some(value) => to_int(field, value, labels),
    }
}

fn float_field(
    map: &Map<String, Value>,
    field: &'static str,
    labels: &[(&str, i32)],
) -> Result<f64, InputError> {
    match map.get(field) {
        None => Ok(0.0),
        Some(value) => to_float(field, value, labels),
    }
}

/// `extracurricular` is either a count or the list of activities
fn activity_count(map: &Map<String, Value>) -> Result<i32, InputError> {
    match map.get("extracurricular") {
        Some(Value::Array(items)) => i32::try_from(items.len())
            .map_err(|_| invalid("extracurricular", "too many activities")),
        Some(value) => to_int("extracurricular", value, &[]),
        None => Ok(0),
    }
}

fn to_int(field: &'static str, value: &Value, labels: &[(&str, i32)]) -> Result<i32, InputError> {
    let wide: i64 = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64().ok_or_else(|| invalid(field, "not a finite number"))?;
                if f.trunc() > i64::MAX as f64 || f.trunc() < i64::MIN as f64 {
                    return Err(invalid(field, "out of range"));
                }
                f.trunc() as i64
            }
        },
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => {
            let s = s.trim();
            match lookup_label(s, labels) {
                Some(code) => i64::from(code),
                None => s
                    .parse::<i64>()
                    .map_err(|_| invalid(field, &format!("'{}' is not an integer", s)))?,
            }
        }
        Value::Null => return Err(invalid(field, "null is not an integer")),
        _ => return Err(invalid(field, "expected an integer")),
    };

    i32::try_from(wide).map_err(|_| invalid(field, "out of range"))
}

fn to_float(field: &'static str, value: &Value, labels: &[(&str, i32)]) -> Result<f64, InputError> {
    let f = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(field, "not a finite number"))?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => {
            let s = s.trim();
            match lookup_label(s, labels) {
                Some(code) => f64::from(code),
                None => s
                    .parse::<f64>()
                    .map_err(|_| invalid(field, &format!("'{}' is not a number", s)))?,
            }
        }
        Value::Null => return Err(invalid(field, "null is not a number")),
        _ => return Err(invalid(field, "expected a number")),
    };

    if f.is_finite() {
        Ok(f)
    } else {
        Err(invalid(field, "not a finite number"))
    }
}

fn lookup_label(s: &str, labels: &[(&str, i32)]) -> Option<i32> {
    labels
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(s))
        .map(|(_, code)| *code)
}

fn invalid(field: &'static str, reason: &str) -> InputError {
    InputError::InvalidField { field, reason: reason.to_string() }
}
