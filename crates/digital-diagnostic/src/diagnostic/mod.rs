//! Questionnaire, answer collection, scoring and reporting.

pub mod analysis;
pub mod catalog;
pub mod collector;
pub mod domain;
pub mod report;
pub mod router;
pub mod scoring;
pub mod sessions;
pub mod views;

pub use analysis::{
    compute_gaps, compute_profile_spreads, compute_strengths_and_weaknesses, Gap, Highlight,
    ProfileGroup, ProfileSpread, StrengthsAndWeaknesses, SIGNIFICANT_GAP,
};
pub use catalog::{Choice, Question, QuestionCatalog};
pub use collector::{
    DiagnosticSession, SessionError, SessionSnapshot, SessionState, StepBackPolicy,
};
pub use domain::{
    Answer, AnswerSet, CompanyInfo, Level, Profile, Universe, ValidationError,
};
pub use report::{render_pdf, render_text, DiagnosticReport};
pub use router::{diagnostic_router, DiagnosticState};
pub use scoring::{
    compute_global_profile, compute_universe_results, overall_score, round_percent,
    GlobalProfileEntry, ProfileScore, UniverseResult,
};
pub use sessions::{SessionId, SessionLifetimes, SessionStore, SessionStoreError};
pub use views::{LevelTone, ResultsView};
