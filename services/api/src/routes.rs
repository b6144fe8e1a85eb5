use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use digital_diagnostic::diagnostic::{diagnostic_router, SessionStore};
use digital_diagnostic::results::{results_router, AdminAuth, ResultRepository, ResultsService};
use serde_json::json;
use std::sync::Arc;

/// Questionnaire, results and operational routes on one router.
pub(crate) fn with_diagnostic_routes<R>(
    sessions: Arc<SessionStore>,
    results: Arc<ResultsService<R>>,
    auth: AdminAuth,
) -> axum::Router
where
    R: ResultRepository + 'static,
{
    diagnostic_router(sessions, Arc::clone(&results))
        .merge(results_router(results, auth))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
