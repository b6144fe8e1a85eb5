use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{
    NewResult, ResultId, ResultOwner, ResultQuery, SortField, SortOrder, StoredResult,
};
use super::export::{results_to_csv, ExportError};
use super::repository::{RepositoryError, ResultRepository};
use crate::diagnostic::{compute_universe_results, overall_score, ResultsView, ValidationError};

/// Service composing validation, scoring and the result repository.
pub struct ResultsService<R> {
    repository: Arc<R>,
}

impl<R> ResultsService<R>
where
    R: ResultRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validate and persist a completed diagnostic.
    ///
    /// A repeated `submission_id` returns the result stored the first time.
    pub fn submit(&self, submission: NewResult) -> Result<StoredResult, ResultsServiceError> {
        self.submit_at(submission, Utc::now())
    }

    pub(crate) fn submit_at(
        &self,
        submission: NewResult,
        created_at: DateTime<Utc>,
    ) -> Result<StoredResult, ResultsServiceError> {
        submission.company_info.validate()?;

        if let Some(token) = submission.submission_id {
            if let Some(existing) = self.repository.find_by_submission(token)? {
                tracing::debug!(result_id = %existing.id, "duplicate submission ignored");
                return Ok(existing);
            }
        }

        let score = overall_score(&compute_universe_results(&submission.answers));
        let result = StoredResult {
            id: ResultId::generate(),
            score,
            user: ResultOwner::for_submission(
                submission.user_id.as_deref(),
                &submission.company_info,
            ),
            answers: submission.answers,
            company_info: submission.company_info,
            created_at,
            submission_id: submission.submission_id,
        };

        match self.repository.insert(result) {
            Ok(stored) => {
                tracing::info!(result_id = %stored.id, score = stored.score, "diagnostic result stored");
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => match submission.submission_id {
                Some(token) => self
                    .repository
                    .find_by_submission(token)?
                    .ok_or(ResultsServiceError::Repository(RepositoryError::Conflict)),
                None => Err(RepositoryError::Conflict.into()),
            },
            Err(other) => Err(other.into()),
        }
    }

    /// Filter and sort stored results for the admin list.
    pub fn list(&self, query: &ResultQuery) -> Result<Vec<StoredResult>, ResultsServiceError> {
        let mut results = self.repository.list()?;

        if let Some(term) = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        {
            let term = term.to_lowercase();
            results.retain(|result| matches_search(result, &term));
        }

        let order = query.effective_order();
        results.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(results)
    }

    pub fn get(&self, id: &ResultId) -> Result<StoredResult, ResultsServiceError> {
        let result = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(result)
    }

    pub fn delete(&self, id: &ResultId) -> Result<(), ResultsServiceError> {
        self.repository.delete(id)?;
        tracing::info!(result_id = %id, "diagnostic result deleted");
        Ok(())
    }

    /// Results screen recomputed from the stored answers.
    pub fn view(&self, id: &ResultId) -> Result<ResultsView, ResultsServiceError> {
        let result = self.get(id)?;
        Ok(ResultsView::build(Some(&result.company_info), &result.answers))
    }

    pub fn export_csv(&self, query: &ResultQuery) -> Result<Vec<u8>, ResultsServiceError> {
        let results = self.list(query)?;
        Ok(results_to_csv(&results)?)
    }
}

fn matches_search(result: &StoredResult, term: &str) -> bool {
    result.display_name().to_lowercase().contains(term)
        || result.display_email().to_lowercase().contains(term)
        || result.score.to_string().contains(term)
}

fn compare(a: &StoredResult, b: &StoredResult, field: SortField) -> Ordering {
    match field {
        SortField::Name => a
            .display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase()),
        SortField::Email => a
            .display_email()
            .to_lowercase()
            .cmp(&b.display_email().to_lowercase()),
        SortField::Score => a.score.total_cmp(&b.score),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Error raised by the results service.
#[derive(Debug, thiserror::Error)]
pub enum ResultsServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
