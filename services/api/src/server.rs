use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredRepository};
use crate::routes::with_diagnostic_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use digital_diagnostic::config::AppConfig;
use digital_diagnostic::diagnostic::{
    QuestionCatalog, SessionLifetimes, SessionStore, StepBackPolicy,
};
use digital_diagnostic::error::AppError;
use digital_diagnostic::results::{AdminAuth, ResultsService};
use digital_diagnostic::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(ConfiguredRepository::from_config(&config.storage)?);
    let results = Arc::new(ResultsService::new(repository));

    let policy = StepBackPolicy::from_retain_flag(config.diagnostic.retain_answers_on_back);
    let lifetimes = SessionLifetimes {
        idle: config.diagnostic.session_ttl,
        completed: config.diagnostic.completed_session_ttl,
    };
    let sessions = Arc::new(SessionStore::with_lifetimes(
        Arc::new(QuestionCatalog::standard()),
        policy,
        lifetimes,
    ));

    let auth = AdminAuth::new(config.admin.token.clone());
    if !auth.is_configured() {
        warn!("APP_ADMIN_TOKEN not set; admin routes will reject every request");
    }

    let app = with_diagnostic_routes(sessions, results, auth)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, ?policy, ?lifetimes, "digital diagnostic service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
