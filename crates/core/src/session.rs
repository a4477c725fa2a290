//! Page-level analysis session.
//!
//! ```text
//! Idle ──begin──▶ Submitting ──succeed──▶ IdleWithResult
//!                     │
//!                     └──────fail───────▶ IdleWithError
//! ```
//!
//! Any idle state may `begin` again. `reset` and `page_hide` clear the store
//! and return to `Idle`; a result arriving after that is discarded.

use crate::envelope::AnalysisEnvelope;
use crate::error::CoreError;
use crate::storage::{ResultStore, KEY_ANALYSIS_TYPE, KEY_RESULTS};
use crate::types::AnalysisMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
    IdleWithResult,
    IdleWithError(String),
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        !matches!(self, Self::Submitting)
    }
}

/// Sequences one analysis at a time over an injected [`ResultStore`].
#[derive(Debug)]
pub struct AnalysisSession<S: ResultStore> {
    store: S,
    state: SessionState,
}

impl<S: ResultStore> AnalysisSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a submission. Rejected while another one is in flight.
    pub fn begin(&mut self) -> Result<(), CoreError> {
        if !self.state.is_idle() {
            return Err(CoreError::InvalidTransition("submission already in progress"));
        }
        self.state = SessionState::Submitting;
        Ok(())
    }

    /// Store a finished analysis, replacing any previous one.
    pub fn succeed(&mut self, envelope: &AnalysisEnvelope) -> Result<(), CoreError> {
        self.expect_submitting()?;
        let json =
            serde_json::to_string(envelope).map_err(|e| CoreError::Internal(e.to_string()))?;
        self.store.put(KEY_RESULTS, json);
        self.store
            .put(KEY_ANALYSIS_TYPE, envelope.mode.as_str().to_string());
        self.state = SessionState::IdleWithResult;
        Ok(())
    }

    /// Record a failed submission. The stored result, if any, is kept.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.expect_submitting()?;
        self.state = SessionState::IdleWithError(message.into());
        Ok(())
    }

    /// Load the stored analysis for the results view.
    pub fn load(&self) -> Result<AnalysisEnvelope, CoreError> {
        let json = self.store.get(KEY_RESULTS).ok_or(CoreError::NoResult)?;
        serde_json::from_str(&json).map_err(|e| {
            tracing::warn!(error = %e, "Stored analysis could not be decoded");
            CoreError::Internal(format!("Stored analysis is unreadable: {e}"))
        })
    }

    /// Mode of the stored analysis. Falls back to the envelope's own tag
    /// when the mode key is missing or unrecognized.
    pub fn stored_mode(&self) -> Result<AnalysisMode, CoreError> {
        if let Some(mode) = self
            .store
            .get(KEY_ANALYSIS_TYPE)
            .and_then(|m| AnalysisMode::from_str_value(&m).ok())
        {
            return Ok(mode);
        }
        self.load().map(|env| env.mode)
    }

    /// "New analysis" / "back": drop the stored result and return to `Idle`.
    pub fn reset(&mut self) {
        self.store.clear();
        self.state = SessionState::Idle;
    }

    /// The page is going away. Same effect as [`reset`](Self::reset); an
    /// in-flight submission's result will be rejected by `succeed`.
    pub fn page_hide(&mut self) {
        tracing::debug!(state = ?self.state, "Page hidden, clearing stored analysis");
        self.reset();
    }

    fn expect_submitting(&self) -> Result<(), CoreError> {
        match self.state {
            SessionState::Submitting => Ok(()),
            _ => Err(CoreError::InvalidTransition("no submission in progress")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
