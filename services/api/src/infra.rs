use digital_diagnostic::config::StorageConfig;
use digital_diagnostic::results::{
    InMemoryResultRepository, JsonFileResultRepository, RepositoryError, ResultId,
    ResultRepository, StoredResult,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Result store selected from `APP_RESULTS_PATH`.
#[derive(Debug)]
pub(crate) enum ConfiguredRepository {
    Memory(InMemoryResultRepository),
    File(JsonFileResultRepository),
}

impl ConfiguredRepository {
    pub(crate) fn from_config(storage: &StorageConfig) -> Result<Self, RepositoryError> {
        match &storage.results_path {
            Some(path) => Ok(Self::File(JsonFileResultRepository::open(path)?)),
            None => {
                tracing::warn!("APP_RESULTS_PATH not set; results are kept in memory only");
                Ok(Self::Memory(InMemoryResultRepository::new()))
            }
        }
    }

    fn inner(&self) -> &dyn ResultRepository {
        match self {
            Self::Memory(repository) => repository,
            Self::File(repository) => repository,
        }
    }
}

impl ResultRepository for ConfiguredRepository {
    fn insert(&self, result: StoredResult) -> Result<StoredResult, RepositoryError> {
        self.inner().insert(result)
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<StoredResult>, RepositoryError> {
        self.inner().fetch(id)
    }

    fn list(&self) -> Result<Vec<StoredResult>, RepositoryError> {
        self.inner().list()
    }

    fn delete(&self, id: &ResultId) -> Result<(), RepositoryError> {
        self.inner().delete(id)
    }

    fn find_by_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<StoredResult>, RepositoryError> {
        self.inner().find_by_submission(submission_id)
    }
}
