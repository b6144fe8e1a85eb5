//! Persistence gateway and admin surface for completed diagnostics.

pub mod auth;
pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use auth::{AdminAuth, SessionStatus};
pub use domain::{
    normalize_timestamp, NewResult, ResultId, ResultOwner, ResultQuery, SortField, SortOrder,
    StoredResult, ANONYMOUS_USER_ID,
};
pub use export::{parse_results_csv, results_to_csv, write_results_csv, ExportError, ExportedResult};
pub use repository::{RepositoryError, ResultRepository};
pub use router::{results_router, ResultsApi};
pub use service::{ResultsService, ResultsServiceError};
pub use store::{InMemoryResultRepository, JsonFileResultRepository};
