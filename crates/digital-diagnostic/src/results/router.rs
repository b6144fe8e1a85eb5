use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::auth::{AdminAuth, SessionStatus};
use super::domain::{NewResult, ResultId, ResultQuery};
use super::export::{CSV_CONTENT_TYPE, CSV_FILE_NAME};
use super::repository::{RepositoryError, ResultRepository};
use super::service::{ResultsService, ResultsServiceError};

/// Shared state for the results routes.
pub struct ResultsApi<R> {
    pub service: Arc<ResultsService<R>>,
    pub auth: AdminAuth,
}

impl<R> Clone for ResultsApi<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            auth: self.auth.clone(),
        }
    }
}

/// Public submission plus the authenticated admin surface.
pub fn results_router<R>(service: Arc<ResultsService<R>>, auth: AdminAuth) -> Router
where
    R: ResultRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/results",
            get(list_handler::<R>).post(submit_handler::<R>),
        )
        .route(
            "/api/v1/results/:result_id",
            get(get_handler::<R>).delete(delete_handler::<R>),
        )
        .route("/api/v1/results/:result_id/view", get(view_handler::<R>))
        .route("/api/v1/exports/results.csv", get(export_handler::<R>))
        .with_state(ResultsApi { service, auth })
}

fn unauthorized() -> Response {
    let payload = json!({
        "error": "admin authentication required",
    });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn require_admin(auth: &AdminAuth, headers: &HeaderMap) -> Result<(), Response> {
    match auth.status(headers) {
        SessionStatus::Authenticated => Ok(()),
        SessionStatus::Unauthenticated => {
            tracing::warn!("rejected unauthenticated admin request");
            Err(unauthorized())
        }
    }
}

pub(crate) fn error_response(error: ResultsServiceError) -> Response {
    let status = match &error {
        ResultsServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ResultsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ResultsServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ResultsServiceError::Repository(RepositoryError::Unavailable(_))
        | ResultsServiceError::Export(_) => {
            tracing::error!(error = %error, "results request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

/// Runs a repository-backed service call on the blocking pool.
async fn run_blocking<R, T, F>(service: Arc<ResultsService<R>>, job: F) -> Result<T, Response>
where
    R: ResultRepository + 'static,
    T: Send + 'static,
    F: FnOnce(&ResultsService<R>) -> Result<T, ResultsServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || job(&service)).await {
        Ok(outcome) => outcome.map_err(error_response),
        Err(error) => {
            tracing::error!(error = %error, "results task aborted");
            let payload = json!({
                "error": "results request aborted",
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

pub(crate) async fn submit_handler<R>(
    State(api): State<ResultsApi<R>>,
    axum::Json(submission): axum::Json<NewResult>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let outcome = run_blocking(api.service, move |service| service.submit(submission)).await;
    match outcome {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn list_handler<R>(
    State(api): State<ResultsApi<R>>,
    headers: HeaderMap,
    Query(query): Query<ResultQuery>,
) -> Response
where
    R: ResultRepository + 'static,
{
    if let Err(response) = require_admin(&api.auth, &headers) {
        return response;
    }
    let outcome = run_blocking(api.service, move |service| service.list(&query)).await;
    match outcome {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn get_handler<R>(
    State(api): State<ResultsApi<R>>,
    headers: HeaderMap,
    Path(result_id): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
{
    if let Err(response) = require_admin(&api.auth, &headers) {
        return response;
    }
    let id = ResultId(result_id);
    let outcome = run_blocking(api.service, move |service| service.get(&id)).await;
    match outcome {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn delete_handler<R>(
    State(api): State<ResultsApi<R>>,
    headers: HeaderMap,
    Path(result_id): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
{
    if let Err(response) = require_admin(&api.auth, &headers) {
        return response;
    }
    let id = ResultId(result_id);
    let outcome = run_blocking(api.service, move |service| service.delete(&id)).await;
    match outcome {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn view_handler<R>(
    State(api): State<ResultsApi<R>>,
    headers: HeaderMap,
    Path(result_id): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
{
    if let Err(response) = require_admin(&api.auth, &headers) {
        return response;
    }
    let id = ResultId(result_id);
    let outcome = run_blocking(api.service, move |service| service.view(&id)).await;
    match outcome {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn export_handler<R>(
    State(api): State<ResultsApi<R>>,
    headers: HeaderMap,
    Query(query): Query<ResultQuery>,
) -> Response
where
    R: ResultRepository + 'static,
{
    if let Err(response) = require_admin(&api.auth, &headers) {
        return response;
    }
    let outcome = run_blocking(api.service, move |service| service.export_csv(&query)).await;
    match outcome {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{CSV_FILE_NAME}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(response) => response,
    }
}
