use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;
use uuid::Uuid;

use crate::diagnostic::{Answer, AnswerSet, CompanyInfo, Level, Profile, Universe};
use crate::results::domain::{NewResult, ResultId, StoredResult};
use crate::results::repository::{RepositoryError, ResultRepository};
use crate::results::{results_router, AdminAuth, InMemoryResultRepository, ResultsService};

pub(super) const ADMIN_TOKEN: &str = "admin-token";

pub(super) fn company(name: &str, email: &str) -> CompanyInfo {
    CompanyInfo {
        name: name.to_string(),
        email: email.to_string(),
        size: "10-49".to_string(),
        sector: "Services".to_string(),
    }
}

/// Every question answered at `level`.
pub(super) fn uniform_answers(level: Level) -> AnswerSet {
    Universe::ordered()
        .into_iter()
        .flat_map(|universe| {
            Profile::ordered()
                .into_iter()
                .map(move |profile| Answer::new(universe, profile, level))
        })
        .collect()
}

pub(super) fn submission(name: &str, level: Level) -> NewResult {
    NewResult {
        user_id: None,
        answers: uniform_answers(level),
        company_info: company(name, &format!("{}@example.fr", name.to_lowercase())),
        submission_id: None,
    }
}

pub(super) fn build_service() -> (
    ResultsService<InMemoryResultRepository>,
    Arc<InMemoryResultRepository>,
) {
    let repository = Arc::new(InMemoryResultRepository::new());
    let service = ResultsService::new(repository.clone());
    (service, repository)
}

pub(super) fn admin_router() -> (axum::Router, Arc<ResultsService<InMemoryResultRepository>>) {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let router = results_router(
        service.clone(),
        AdminAuth::new(Some(ADMIN_TOKEN.to_string())),
    );
    (router, service)
}

pub(super) fn bearer() -> String {
    format!("Bearer {ADMIN_TOKEN}")
}

pub(super) struct UnavailableRepository;

impl ResultRepository for UnavailableRepository {
    fn insert(&self, _result: StoredResult) -> Result<StoredResult, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ResultId) -> Result<Option<StoredResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<StoredResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ResultId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_submission(
        &self,
        _submission_id: Uuid,
    ) -> Result<Option<StoredResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
