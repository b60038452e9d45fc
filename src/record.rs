use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const OBSERVATION_MAX_CHARS: usize = 500;
pub const LESSON_TOPIC_MAX_CHARS: usize = 80;
pub const MAX_ACHIEVEMENT_TAGS: usize = 6;

pub const REQUIRED_FIELDS: [&str; 9] = [
    "teacherId",
    "teacherName",
    "subjectId",
    "subjectName",
    "classId",
    "className",
    "studentId",
    "studentName",
    "observation",
];

/// A single persisted classroom observation. Reference fields are snapshots
/// of what the client submitted, never re-resolved against school data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    pub id: String,
    pub created_at: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub subject_id: String,
    pub subject_name: String,
    pub class_id: String,
    pub class_name: String,
    pub student_id: String,
    pub student_name: String,
    pub lesson_topic: String,
    pub achievement_tags: Vec<String>,
    pub observation: String,
    pub growth_note: String,
    pub next_guide: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be {max} characters or fewer")]
    FieldTooLong { field: &'static str, max: usize },
}

/// Length in UTF-16 code units, the unit browsers count in.
fn char_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Checks a raw submission. Stops at the first failing constraint.
pub fn validate_submission(input: &Value) -> Result<(), ValidationError> {
    for key in REQUIRED_FIELDS {
        match input.get(key).and_then(|v| v.as_str()) {
            Some(s) if !s.trim().is_empty() => {}
            _ => return Err(ValidationError::MissingField(key)),
        }
    }

    // Measured on the raw value; trimming happens later.
    let observation = input
        .get("observation")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if char_len(observation) > OBSERVATION_MAX_CHARS {
        return Err(ValidationError::FieldTooLong {
            field: "observation",
            max: OBSERVATION_MAX_CHARS,
        });
    }

    if char_len(optional_text(input, "lessonTopic")) > LESSON_TOPIC_MAX_CHARS {
        return Err(ValidationError::FieldTooLong {
            field: "lessonTopic",
            max: LESSON_TOPIC_MAX_CHARS,
        });
    }

    Ok(())
}

fn optional_text<'a>(input: &'a Value, key: &str) -> &'a str {
    input.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn trimmed(input: &Value, key: &str) -> String {
    optional_text(input, key).trim().to_string()
}

/// Text form of a tag element, as a browser's `String(value)` would print it.
fn tag_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // Array joins print null holes as nothing.
                Value::Null => String::new(),
                other => tag_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        // f64 Display drops the ".0" on integral values.
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

pub fn normalize_tags(raw: Option<&Value>) -> Vec<String> {
    let Some(items) = raw.and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|v| tag_text(v).trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_ACHIEVEMENT_TAGS)
        .collect()
}

/// `R-` plus the first 8 hex digits of a v4 uuid (OS randomness).
/// No uniqueness check against the store is made.
pub fn new_record_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("R-{}", &hex[..8])
}

pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds the persisted form of a submission that already passed
/// `validate_submission`.
pub fn normalize_submission(input: &Value) -> ObservationRecord {
    ObservationRecord {
        id: new_record_id(),
        created_at: now_iso8601(),
        teacher_id: trimmed(input, "teacherId"),
        teacher_name: trimmed(input, "teacherName"),
        subject_id: trimmed(input, "subjectId"),
        subject_name: trimmed(input, "subjectName"),
        class_id: trimmed(input, "classId"),
        class_name: trimmed(input, "className"),
        student_id: trimmed(input, "studentId"),
        student_name: trimmed(input, "studentName"),
        lesson_topic: trimmed(input, "lessonTopic"),
        achievement_tags: normalize_tags(input.get("achievementTags")),
        observation: trimmed(input, "observation"),
        growth_note: trimmed(input, "growthNote"),
        next_guide: trimmed(input, "nextGuide"),
    }
}
