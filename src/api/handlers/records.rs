use crate::api::error::{ok, ApiError};
use crate::api::types::AppState;
use crate::record::{normalize_submission, validate_submission, ObservationRecord};
use crate::school::SchoolData;
use crate::store::DEFAULT_RECENT_WINDOW;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{json, Value};

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::BadJson)
}

/// Reference fields of `record` whose ids the loaded school data lacks.
fn unknown_references(school: &SchoolData, record: &ObservationRecord) -> Vec<&'static str> {
    let mut out = Vec::new();
    if school.subject(&record.subject_id).is_none() {
        out.push("subjectId");
    }
    if school.class(&record.class_id).is_none() {
        out.push("classId");
    }
    if school.student(&record.student_id).is_none() {
        out.push("studentId");
    }
    out
}

// Not a rejection: records keep the submitted snapshot.
fn note_unknown_references(state: &AppState, record: &ObservationRecord) {
    let Ok(school) = state.school() else {
        return;
    };
    let unknown = unknown_references(school, record);
    if !unknown.is_empty() {
        tracing::debug!(
            record_id = %record.id,
            fields = ?unknown,
            "record references ids outside the loaded reference data"
        );
    }
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let payload = parse_body(&body)?;
    validate_submission(&payload)?;
    let record = normalize_submission(&payload);
    note_unknown_references(&state, &record);

    let outcome = state.backend.persist(&record).await?;
    tracing::info!(
        record_id = %record.id,
        storage = outcome.storage.label(),
        "record saved"
    );

    let mut resp = json!({
        "ok": true,
        "storage": outcome.storage.label(),
        "record": record,
    });
    if let Some(warning) = outcome.warning {
        resp["warning"] = json!(warning);
    }
    Ok(ok(StatusCode::CREATED, resp))
}

pub async fn local(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.writer.recent(DEFAULT_RECENT_WINDOW).await?;
    Ok(ok(
        StatusCode::OK,
        json!({ "mode": "local", "records": records }),
    ))
}
