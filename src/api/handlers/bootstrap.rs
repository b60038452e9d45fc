use crate::api::error::{ok, ApiError};
use crate::api::types::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

pub async fn bootstrap(State(state): State<AppState>) -> Result<Response, ApiError> {
    let school = state.school()?;
    let body = serde_json::to_value(school.document())
        .map_err(|e| ApiError::ReferenceData(e.to_string()))?;
    Ok(ok(StatusCode::OK, body))
}

pub async fn subject_classes(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> Result<Response, ApiError> {
    let school = state.school()?;
    if school.subject(&subject_id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(ok(
        StatusCode::OK,
        json!({ "classes": school.classes_for_subject(&subject_id) }),
    ))
}

pub async fn class_students(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> Result<Response, ApiError> {
    let school = state.school()?;
    if school.class(&class_id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(ok(
        StatusCode::OK,
        json!({ "students": school.students_for_class(&class_id) }),
    ))
}
