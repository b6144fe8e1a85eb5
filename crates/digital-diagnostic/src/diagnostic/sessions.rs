use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::QuestionCatalog;
use super::collector::{
    DiagnosticSession, SessionError, SessionSnapshot, SessionState, StepBackPolicy,
};
use super::domain::CompanyInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("diagnostic session {0} not found")]
    NotFound(SessionId),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// How long sessions are kept after their last request.
///
/// Completed sessions only need to outlive the results and report downloads, so they
/// usually get a shorter window than sessions still collecting answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLifetimes {
    pub idle: Duration,
    pub completed: Duration,
}

impl Default for SessionLifetimes {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(60 * 60),
            completed: Duration::from_secs(15 * 60),
        }
    }
}

impl SessionLifetimes {
    fn for_state(&self, state: SessionState) -> Duration {
        match state {
            SessionState::Complete => self.completed,
            SessionState::Idle | SessionState::Collecting => self.idle,
        }
    }
}

#[derive(Debug)]
struct Entry {
    session: DiagnosticSession,
    touched: Instant,
}

/// Owns every in-flight diagnostic session; mutations are serialised per store.
///
/// Expired sessions are dropped on every access, so abandoned and completed runs do
/// not keep company details or answers around.
#[derive(Debug)]
pub struct SessionStore {
    catalog: Arc<QuestionCatalog>,
    policy: StepBackPolicy,
    lifetimes: SessionLifetimes,
    sessions: Mutex<HashMap<SessionId, Entry>>,
}

impl SessionStore {
    pub fn new(catalog: Arc<QuestionCatalog>, policy: StepBackPolicy) -> Self {
        Self::with_lifetimes(catalog, policy, SessionLifetimes::default())
    }

    pub fn with_lifetimes(
        catalog: Arc<QuestionCatalog>,
        policy: StepBackPolicy,
        lifetimes: SessionLifetimes,
    ) -> Self {
        Self {
            catalog,
            policy,
            lifetimes,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> StepBackPolicy {
        self.policy
    }

    pub fn lifetimes(&self) -> SessionLifetimes {
        self.lifetimes
    }

    /// Locks the map after dropping every expired session.
    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, Entry>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.duration_since(entry.touched) < self.lifetimes.for_state(entry.session.state())
        });
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(
                pruned,
                remaining = sessions.len(),
                "expired diagnostic sessions dropped"
            );
        }
        sessions
    }

    /// Validates the company details and registers a new collecting session.
    pub fn start(
        &self,
        company: CompanyInfo,
    ) -> Result<(SessionId, SessionSnapshot), SessionStoreError> {
        let mut session = DiagnosticSession::new(Arc::clone(&self.catalog), self.policy);
        session.start(company)?;

        let id = SessionId::new();
        let snapshot = session.snapshot();
        self.sessions().insert(
            id,
            Entry {
                session,
                touched: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, "diagnostic session started");
        Ok((id, snapshot))
    }

    pub fn get(&self, id: SessionId) -> Result<DiagnosticSession, SessionStoreError> {
        let mut sessions = self.sessions();
        let entry = sessions
            .get_mut(&id)
            .ok_or(SessionStoreError::NotFound(id))?;
        entry.touched = Instant::now();
        Ok(entry.session.clone())
    }

    /// Runs `change` against the session while holding the store lock.
    pub fn update<T, F>(&self, id: SessionId, change: F) -> Result<T, SessionStoreError>
    where
        F: FnOnce(&mut DiagnosticSession) -> Result<T, SessionError>,
    {
        let mut sessions = self.sessions();
        let entry = sessions
            .get_mut(&id)
            .ok_or(SessionStoreError::NotFound(id))?;
        entry.touched = Instant::now();
        Ok(change(&mut entry.session)?)
    }

    /// Drops the session and everything it collected.
    pub fn remove(&self, id: SessionId) -> Result<(), SessionStoreError> {
        match self.sessions().remove(&id) {
            Some(mut entry) => {
                entry.session.reset();
                tracing::debug!(session_id = %id, "diagnostic session discarded");
                Ok(())
            }
            None => Err(SessionStoreError::NotFound(id)),
        }
    }

    /// Number of live sessions, after expired ones are dropped.
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(QuestionCatalog::standard()), StepBackPolicy::Retain)
    }

    fn company() -> CompanyInfo {
        CompanyInfo {
            name: "Atelier Numérique".to_string(),
            email: "direction@atelier.fr".to_string(),
            ..CompanyInfo::default()
        }
    }

    #[test]
    fn start_registers_a_collecting_session() {
        let store = store();
        let (id, snapshot) = store.start(company()).expect("start");

        assert_eq!(snapshot.state, SessionState::Collecting);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).expect("session").step(), 0);
    }

    #[test]
    fn invalid_company_registers_nothing() {
        let store = store();
        let error = store
            .start(CompanyInfo::default())
            .expect_err("missing name");

        assert!(matches!(error, SessionStoreError::Session(SessionError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn update_mutates_the_stored_session() {
        let store = store();
        let (id, _) = store.start(company()).expect("start");

        store
            .update(id, |session| session.answer(1))
            .expect("answer");

        assert_eq!(store.get(id).expect("session").answers().len(), 1);
    }

    #[test]
    fn unknown_sessions_are_reported() {
        let store = store();
        let id = SessionId::new();

        assert_eq!(store.get(id).err(), Some(SessionStoreError::NotFound(id)));
        assert_eq!(
            store.update(id, |session| session.previous()),
            Err(SessionStoreError::NotFound(id))
        );
        assert_eq!(store.remove(id), Err(SessionStoreError::NotFound(id)));
    }

    #[test]
    fn remove_discards_the_session() {
        let store = store();
        let (id, _) = store.start(company()).expect("start");

        store.remove(id).expect("remove");
        assert!(store.is_empty());
    }

    fn store_with(lifetimes: SessionLifetimes) -> SessionStore {
        SessionStore::with_lifetimes(
            Arc::new(QuestionCatalog::standard()),
            StepBackPolicy::Retain,
            lifetimes,
        )
    }

    #[test]
    fn idle_sessions_expire_after_their_lifetime() {
        let store = store_with(SessionLifetimes {
            idle: Duration::ZERO,
            completed: Duration::from_secs(60),
        });
        let (abandoned, _) = store.start(company()).expect("start");

        assert_eq!(store.get(abandoned).err(), Some(SessionStoreError::NotFound(abandoned)));
        assert!(store.is_empty());
    }

    #[test]
    fn completed_sessions_are_dropped_once_their_window_closes() {
        let store = store_with(SessionLifetimes {
            idle: Duration::from_secs(60 * 60),
            completed: Duration::ZERO,
        });
        let (finished, _) = store.start(company()).expect("start");
        let (in_progress, _) = store.start(company()).expect("start");

        for _ in 0..store.catalog().len() {
            store
                .update(finished, |session| session.answer(0))
                .expect("answer");
        }

        let (_, _) = store.start(company()).expect("start another");

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(finished).err(), Some(SessionStoreError::NotFound(finished)));
        assert_eq!(store.get(in_progress).expect("still collecting").step(), 0);
    }

    #[test]
    fn abandoned_starts_do_not_accumulate() {
        let store = store_with(SessionLifetimes {
            idle: Duration::ZERO,
            completed: Duration::ZERO,
        });

        for _ in 0..100 {
            store.start(company()).expect("start");
        }

        assert!(store.len() <= 1);
    }

    #[test]
    fn access_refreshes_the_idle_window() {
        let store = store();
        let (id, _) = store.start(company()).expect("start");

        store.update(id, |session| session.answer(2)).expect("answer");
        store.get(id).expect("session kept");

        assert_eq!(store.len(), 1);
        assert_eq!(store.lifetimes(), SessionLifetimes::default());
    }
}
