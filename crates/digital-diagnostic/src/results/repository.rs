use uuid::Uuid;

use super::domain::{ResultId, StoredResult};

/// Storage abstraction for persisted diagnostic results.
pub trait ResultRepository: Send + Sync {
    fn insert(&self, result: StoredResult) -> Result<StoredResult, RepositoryError>;
    fn fetch(&self, id: &ResultId) -> Result<Option<StoredResult>, RepositoryError>;
    /// Every stored result, newest first.
    fn list(&self) -> Result<Vec<StoredResult>, RepositoryError>;
    fn delete(&self, id: &ResultId) -> Result<(), RepositoryError>;
    fn find_by_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<StoredResult>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
