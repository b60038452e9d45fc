use crate::persist::PersistError;
use crate::record::ValidationError;
use crate::writer::WriterError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const GENERIC_SERVER_ERROR: &str = "an internal server error occurred";

pub fn ok(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

pub fn err(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request body must be valid JSON")]
    BadJson,
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Records(#[from] WriterError),
    #[error("reference data unavailable: {0}")]
    ReferenceData(String),
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadJson => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Persist(_) | Self::Records(_) | Self::ReferenceData(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Cause stays in the log; clients get the generic message.
            tracing::error!(error = %self, "request failed");
            return err(status, GENERIC_SERVER_ERROR);
        }
        tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        err(status, self.to_string())
    }
}
