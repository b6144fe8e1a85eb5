use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::collector::{SessionError, SessionState};
use super::domain::{AnswerSet, CompanyInfo};
use super::report::{render_pdf, DiagnosticReport};
use super::sessions::{SessionId, SessionStore, SessionStoreError};
use super::views::ResultsView;
use crate::results::{NewResult, ResultRepository, ResultsService};

/// Shared state for the questionnaire routes.
pub struct DiagnosticState<R> {
    pub sessions: Arc<SessionStore>,
    pub results: Arc<ResultsService<R>>,
}

impl<R> Clone for DiagnosticState<R> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            results: Arc::clone(&self.results),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub answers: AnswerSet,
    #[serde(default, alias = "companyInfo")]
    pub company_info: Option<CompanyInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub answers: AnswerSet,
    #[serde(alias = "companyInfo")]
    pub company_info: CompanyInfo,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub choice: usize,
}

/// Router builder for the catalog, stateless analysis and session endpoints.
pub fn diagnostic_router<R>(sessions: Arc<SessionStore>, results: Arc<ResultsService<R>>) -> Router
where
    R: ResultRepository + 'static,
{
    Router::new()
        .route("/api/v1/diagnostic/questions", get(questions_handler::<R>))
        .route("/api/v1/diagnostic/analysis", post(analysis_handler))
        .route("/api/v1/diagnostic/report", post(report_handler))
        .route("/api/v1/diagnostic/sessions", post(start_handler::<R>))
        .route(
            "/api/v1/diagnostic/sessions/:session_id",
            get(snapshot_handler::<R>).delete(reset_handler::<R>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/answers",
            post(answer_handler::<R>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/previous",
            post(previous_handler::<R>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/results",
            get(session_results_handler::<R>),
        )
        .route(
            "/api/v1/diagnostic/sessions/:session_id/report",
            get(session_report_handler::<R>),
        )
        .with_state(DiagnosticState { sessions, results })
}

fn error_payload(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn session_error_response(error: SessionStoreError) -> Response {
    let status = match &error {
        SessionStoreError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionStoreError::Session(
            SessionError::Validation(_) | SessionError::ChoiceOutOfRange { .. },
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionStoreError::Session(
            SessionError::AlreadyStarted
            | SessionError::NotCollecting(_)
            | SessionError::AtFirstQuestion,
        ) => StatusCode::CONFLICT,
    };
    error_payload(status, error.to_string())
}

fn pdf_response(report: &DiagnosticReport) -> Response {
    let slug: String = report
        .company
        .name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_lowercase() } else { '-' })
        .collect();
    let disposition = format!(
        "attachment; filename=\"diagnostic-{}.pdf\"",
        slug.trim_matches('-')
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_pdf(report),
    )
        .into_response()
}

/// Hands a completed session to the results store without blocking the response.
fn persist_completed<R>(results: Arc<ResultsService<R>>, session_id: SessionId, submission: NewResult)
where
    R: ResultRepository + 'static,
{
    tokio::spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || results.submit(submission)).await;
        match outcome {
            Ok(Ok(stored)) => {
                tracing::info!(session_id = %session_id, result_id = %stored.id, "completed diagnostic persisted");
            }
            Ok(Err(error)) => {
                tracing::warn!(session_id = %session_id, error = %error, "failed to persist completed diagnostic");
            }
            Err(error) => {
                tracing::warn!(session_id = %session_id, error = %error, "persistence task aborted");
            }
        }
    });
}

pub(crate) async fn questions_handler<R>(State(state): State<DiagnosticState<R>>) -> Response
where
    R: ResultRepository + 'static,
{
    let catalog = state.sessions.catalog();
    let payload = json!({
        "total": catalog.len(),
        "questions": catalog.questions(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn analysis_handler(axum::Json(request): axum::Json<AnalysisRequest>) -> Response {
    let view = ResultsView::build(request.company_info.as_ref(), &request.answers);
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn report_handler(axum::Json(request): axum::Json<ReportRequest>) -> Response {
    if let Err(error) = request.company_info.validate() {
        return error_payload(StatusCode::UNPROCESSABLE_ENTITY, error.to_string());
    }
    let report = DiagnosticReport::from_answers(
        &request.company_info,
        &request.answers,
        Utc::now().date_naive(),
    );
    pdf_response(&report)
}

pub(crate) async fn start_handler<R>(
    State(state): State<DiagnosticState<R>>,
    axum::Json(company): axum::Json<CompanyInfo>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match state.sessions.start(company) {
        Ok((session_id, snapshot)) => {
            let payload = json!({
                "session_id": session_id,
                "session": snapshot,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn snapshot_handler<R>(
    State(state): State<DiagnosticState<R>>,
    Path(session_id): Path<Uuid>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match state.sessions.get(SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session.snapshot())).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn answer_handler<R>(
    State(state): State<DiagnosticState<R>>,
    Path(session_id): Path<Uuid>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let session_id = SessionId(session_id);
    let outcome = state.sessions.update(session_id, |session| {
        let next = session.answer(request.choice)?;
        let completed = (next == SessionState::Complete).then(|| {
            let company = session.company().cloned().unwrap_or_default();
            let submission = NewResult {
                user_id: None,
                answers: session.answers().clone(),
                company_info: company.clone(),
                submission_id: Some(session.submission_id()),
            };
            (submission, ResultsView::build(Some(&company), session.answers()))
        });
        Ok((session.snapshot(), completed))
    });

    match outcome {
        Ok((snapshot, None)) => (StatusCode::OK, axum::Json(json!({ "session": snapshot }))).into_response(),
        Ok((snapshot, Some((submission, view)))) => {
            persist_completed(Arc::clone(&state.results), session_id, submission);
            let payload = json!({
                "session": snapshot,
                "results": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn previous_handler<R>(
    State(state): State<DiagnosticState<R>>,
    Path(session_id): Path<Uuid>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let outcome = state.sessions.update(SessionId(session_id), |session| {
        session.previous()?;
        Ok(session.snapshot())
    });
    match outcome {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn session_results_handler<R>(
    State(state): State<DiagnosticState<R>>,
    Path(session_id): Path<Uuid>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match state.sessions.get(SessionId(session_id)) {
        Ok(session) => {
            let view = ResultsView::build(session.company(), session.answers());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn session_report_handler<R>(
    State(state): State<DiagnosticState<R>>,
    Path(session_id): Path<Uuid>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let session = match state.sessions.get(SessionId(session_id)) {
        Ok(session) => session,
        Err(error) => return session_error_response(error),
    };
    let Some(company) = session.company() else {
        return session_error_response(SessionStoreError::Session(SessionError::NotCollecting(
            session.state(),
        )));
    };

    let report = DiagnosticReport::from_answers(company, session.answers(), Utc::now().date_naive());
    pdf_response(&report)
}

pub(crate) async fn reset_handler<R>(
    State(state): State<DiagnosticState<R>>,
    Path(session_id): Path<Uuid>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match state.sessions.remove(SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => session_error_response(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::catalog::QuestionCatalog;
    use crate::diagnostic::collector::StepBackPolicy;
    use crate::results::InMemoryResultRepository;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        let sessions = Arc::new(SessionStore::new(
            Arc::new(QuestionCatalog::standard()),
            StepBackPolicy::Retain,
        ));
        let results = Arc::new(ResultsService::new(Arc::new(InMemoryResultRepository::new())));
        diagnostic_router(sessions, results)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn questions_route_lists_the_catalog() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/diagnostic/questions")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["total"], 24);
        assert_eq!(payload["questions"][0]["universe"], "Transformation Digitale");
        assert_eq!(payload["questions"][0]["choices"][3]["level"], "Expert");
    }

    #[tokio::test]
    async fn analysis_ignores_client_scores() {
        let body = json!({
            "answers": {
                "Data|Leaders": { "universe": "Data", "profile": "Leaders", "level": "Expert", "score": 3 }
            }
        });

        let response = router()
            .oneshot(post_json("/api/v1/diagnostic/analysis", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["overall_score"], 4);
        assert_eq!(payload["radar"][5]["points"][0]["score"], 100);
    }

    #[tokio::test]
    async fn report_requires_company_details() {
        let body = json!({
            "answers": {},
            "company_info": { "name": "", "email": "contact@example.fr" }
        });

        let response = router()
            .oneshot(post_json("/api/v1/diagnostic/report", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn report_returns_a_pdf_attachment() {
        let body = json!({
            "answers": {},
            "companyInfo": { "name": "Hexa Cube", "email": "contact@example.fr" }
        });

        let response = router()
            .oneshot(post_json("/api/v1/diagnostic/report", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"diagnostic-hexa-cube.pdf\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn invalid_company_cannot_start_a_session() {
        let response = router()
            .oneshot(post_json(
                "/api/v1/diagnostic/sessions",
                json!({ "name": "Hexacube", "email": "no-at-sign" }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let response = router()
            .oneshot(
                Request::get(format!("/api/v1/diagnostic/sessions/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stepping_back_from_the_first_question_conflicts() {
        let router = router();
        let response = router
            .clone()
            .oneshot(post_json(
                "/api/v1/diagnostic/sessions",
                json!({ "name": "Hexacube", "email": "contact@hexacube.fr" }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let session_id = json_body(response).await["session_id"]
            .as_str()
            .expect("session id")
            .to_string();

        let response = router
            .oneshot(
                Request::post(format!("/api/v1/diagnostic/sessions/{session_id}/previous"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
