use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::domain::{ResultId, StoredResult};
use super::repository::{RepositoryError, ResultRepository};

fn newest_first(mut results: Vec<StoredResult>) -> Vec<StoredResult> {
    results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    results
}

fn check_unique<'a, I>(existing: I, candidate: &StoredResult) -> Result<(), RepositoryError>
where
    I: IntoIterator<Item = &'a StoredResult>,
{
    let duplicate = existing.into_iter().any(|stored| {
        stored.id == candidate.id
            || (candidate.submission_id.is_some() && stored.submission_id == candidate.submission_id)
    });
    if duplicate {
        Err(RepositoryError::Conflict)
    } else {
        Ok(())
    }
}

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryResultRepository {
    records: Mutex<BTreeMap<ResultId, StoredResult>>,
}

impl InMemoryResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<ResultId, StoredResult>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultRepository for InMemoryResultRepository {
    fn insert(&self, result: StoredResult) -> Result<StoredResult, RepositoryError> {
        let mut records = self.records();
        check_unique(records.values(), &result)?;
        records.insert(result.id.clone(), result.clone());
        Ok(result)
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<StoredResult>, RepositoryError> {
        Ok(self.records().get(id).cloned())
    }

    fn list(&self) -> Result<Vec<StoredResult>, RepositoryError> {
        Ok(newest_first(self.records().values().cloned().collect()))
    }

    fn delete(&self, id: &ResultId) -> Result<(), RepositoryError> {
        self.records()
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn find_by_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<StoredResult>, RepositoryError> {
        Ok(self
            .records()
            .values()
            .find(|stored| stored.submission_id == Some(submission_id))
            .cloned())
    }
}

/// Keeps the whole collection in one JSON array on disk.
///
/// Every mutation rewrites the file through a temporary sibling and a rename, so a
/// reader never sees a half-written document.
#[derive(Debug)]
pub struct JsonFileResultRepository {
    path: PathBuf,
    records: Mutex<Vec<StoredResult>>,
}

fn unavailable(context: &str, path: &Path, error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Unavailable(format!("{context} {}: {error}", path.display()))
}

impl JsonFileResultRepository {
    /// Loads `path` if it exists; a missing file starts an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let records = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<StoredResult>>(&bytes)
                .map_err(|error| unavailable("failed to parse", &path, error))?,
            Err(error) if error.kind() == ErrorKind::NotFound => Vec::new(),
            Err(error) => return Err(unavailable("failed to read", &path, error)),
        };

        tracing::info!(path = %path.display(), results = records.len(), "results store opened");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn records(&self) -> MutexGuard<'_, Vec<StoredResult>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, records: &[StoredResult]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|error| unavailable("failed to create directory for", &self.path, error))?;
        }

        let payload = serde_json::to_vec_pretty(records)
            .map_err(|error| unavailable("failed to encode", &self.path, error))?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, payload)
            .map_err(|error| unavailable("failed to write", &staging, error))?;
        fs::rename(&staging, &self.path)
            .map_err(|error| unavailable("failed to replace", &self.path, error))?;
        Ok(())
    }
}

impl ResultRepository for JsonFileResultRepository {
    fn insert(&self, result: StoredResult) -> Result<StoredResult, RepositoryError> {
        let mut records = self.records();
        check_unique(records.iter(), &result)?;

        let mut next = records.clone();
        next.push(result.clone());
        self.persist(&next)?;
        *records = next;
        Ok(result)
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<StoredResult>, RepositoryError> {
        Ok(self.records().iter().find(|stored| &stored.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<StoredResult>, RepositoryError> {
        Ok(newest_first(self.records().clone()))
    }

    fn delete(&self, id: &ResultId) -> Result<(), RepositoryError> {
        let mut records = self.records();
        let next: Vec<StoredResult> = records
            .iter()
            .filter(|stored| &stored.id != id)
            .cloned()
            .collect();
        if next.len() == records.len() {
            return Err(RepositoryError::NotFound);
        }

        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn find_by_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<StoredResult>, RepositoryError> {
        Ok(self
            .records()
            .iter()
            .find(|stored| stored.submission_id == Some(submission_id))
            .cloned())
    }
}
