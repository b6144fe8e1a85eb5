use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::catalog::{Question, QuestionCatalog};
use super::domain::{Answer, AnswerSet, CompanyInfo, Level, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Collecting,
    Complete,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Collecting => "Collecting",
            SessionState::Complete => "Complete",
        }
    }
}

/// What happens to later answers when the respondent steps back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepBackPolicy {
    /// Keep every answer; revisiting a question overwrites it.
    #[default]
    Retain,
    /// Drop answers for the question stepped back to and everything after it.
    Discard,
}

impl StepBackPolicy {
    pub const fn from_retain_flag(retain: bool) -> Self {
        if retain {
            StepBackPolicy::Retain
        } else {
            StepBackPolicy::Discard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a diagnostic is already in progress")]
    AlreadyStarted,
    #[error("the diagnostic is not collecting answers (state: {})", .0.label())]
    NotCollecting(SessionState),
    #[error("choice {choice} is out of range for a question with {available} choices")]
    ChoiceOutOfRange { choice: usize, available: usize },
    #[error("already at the first question")]
    AtFirstQuestion,
}

/// One respondent's walk through the questionnaire.
///
/// Answers, company details and the submission token live here until [`reset`] is
/// called; every derived figure is recomputed from [`answers`] on demand.
///
/// [`reset`]: DiagnosticSession::reset
/// [`answers`]: DiagnosticSession::answers
#[derive(Debug, Clone)]
pub struct DiagnosticSession {
    catalog: Arc<QuestionCatalog>,
    policy: StepBackPolicy,
    state: SessionState,
    step: usize,
    company: Option<CompanyInfo>,
    answers: AnswerSet,
    submission_id: Uuid,
}

impl DiagnosticSession {
    pub fn new(catalog: Arc<QuestionCatalog>, policy: StepBackPolicy) -> Self {
        Self {
            catalog,
            policy,
            state: SessionState::Idle,
            step: 0,
            company: None,
            answers: AnswerSet::new(),
            submission_id: Uuid::new_v4(),
        }
    }

    pub fn start(&mut self, company: CompanyInfo) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        company.validate()?;

        self.company = Some(company);
        self.step = 0;
        self.state = if self.catalog.is_empty() {
            SessionState::Complete
        } else {
            SessionState::Collecting
        };
        Ok(())
    }

    /// Records `choice` for the current question and advances.
    pub fn answer(&mut self, choice: usize) -> Result<SessionState, SessionError> {
        let question = self.current_question().ok_or(SessionError::NotCollecting(self.state))?;
        let selected = question
            .choices
            .get(choice)
            .ok_or(SessionError::ChoiceOutOfRange {
                choice,
                available: question.choices.len(),
            })?;

        let answer = Answer::new(question.universe, question.profile, selected.level);
        self.answers.record(answer);

        self.step += 1;
        if self.step >= self.catalog.len() {
            self.state = SessionState::Complete;
        }
        Ok(self.state)
    }

    pub fn previous(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Collecting {
            return Err(SessionError::NotCollecting(self.state));
        }
        if self.step == 0 {
            return Err(SessionError::AtFirstQuestion);
        }

        self.step -= 1;
        if self.policy == StepBackPolicy::Discard {
            for question in &self.catalog.questions()[self.step..] {
                self.answers.remove(question.universe, question.profile);
            }
        }
        Ok(())
    }

    /// Back to `Idle` with no answers and no company details.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.step = 0;
        self.company = None;
        self.answers.clear();
        self.submission_id = Uuid::new_v4();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn policy(&self) -> StepBackPolicy {
        self.policy
    }

    pub fn company(&self) -> Option<&CompanyInfo> {
        self.company.as_ref()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Idempotency token for persisting this run; renewed on reset.
    pub fn submission_id(&self) -> Uuid {
        self.submission_id
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::Collecting => self.catalog.get(self.step),
            _ => None,
        }
    }

    /// Level previously recorded for the current question, if any.
    pub fn selected_level(&self) -> Option<Level> {
        let question = self.current_question()?;
        self.answers
            .get(question.universe, question.profile)
            .map(|answer| answer.level)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            state_label: self.state.label(),
            step: self.step,
            total_steps: self.catalog.len(),
            answered: self.answers.len(),
            company: self.company.clone(),
            question: self.current_question().cloned(),
            selected_level: self.selected_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub state_label: &'static str,
    pub step: usize,
    pub total_steps: usize,
    pub answered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_level: Option<Level>,
}
