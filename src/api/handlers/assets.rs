use crate::api::error::ApiError;
use crate::api::types::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::path::{Path, PathBuf};

const INDEX: &str = "index.html";
const HTML: &str = "text/html; charset=utf-8";

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => HTML,
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("webmanifest") => "application/manifest+json; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Maps a request path onto a relative file path under the public root.
/// `None` means the path tries to climb out of it.
fn resolve(request_path: &str) -> Option<PathBuf> {
    let mut parts: Vec<&str> = Vec::new();
    for seg in request_path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s if s.contains('\\') || s.contains('\0') => return None,
            s => parts.push(s),
        }
    }
    if parts.is_empty() {
        return Some(PathBuf::from(INDEX));
    }
    Some(parts.iter().collect())
}

/// Everything not matched by an API route. Unknown paths get the index
/// document so client-side routes still load.
pub async fn serve(State(state): State<AppState>, uri: Uri) -> Result<Response, ApiError> {
    let rel = resolve(uri.path()).ok_or(ApiError::Forbidden)?;
    let full = state.public_dir.join(&rel);

    if let Ok(bytes) = tokio::fs::read(&full).await {
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(&full))],
            bytes,
        )
            .into_response());
    }

    match tokio::fs::read(state.public_dir.join(INDEX)).await {
        Ok(bytes) => Ok((StatusCode::OK, [(header::CONTENT_TYPE, HTML)], bytes).into_response()),
        Err(e) => {
            tracing::warn!(error = %e, public_dir = %state.public_dir.display(), "index document missing");
            Err(ApiError::NotFound)
        }
    }
}
