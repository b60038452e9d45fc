use super::handlers::{assets, bootstrap, core, records};
use super::types::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

/// Any method an API path does not handle falls through to static serving,
/// the same as an unknown path.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(core::health).fallback(assets::serve))
        .route(
            "/api/bootstrap",
            get(bootstrap::bootstrap).fallback(assets::serve),
        )
        .route(
            "/api/subjects/:subject_id/classes",
            get(bootstrap::subject_classes).fallback(assets::serve),
        )
        .route(
            "/api/classes/:class_id/students",
            get(bootstrap::class_students).fallback(assets::serve),
        )
        .route("/api/records", post(records::create).fallback(assets::serve))
        .route(
            "/api/records/local",
            get(records::local).fallback(assets::serve),
        )
        .fallback(assets::serve)
        .layer(middleware::from_fn(core::preflight_and_log))
        .with_state(state)
}
