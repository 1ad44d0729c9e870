//! Caller-side conversion lifecycle as an explicit state machine.
//!
//! The engine itself is stateless: [`crate::convert`] is a pure request →
//! outcome function. What a caller usually wants on top of it is a small
//! amount of lifecycle — "a file is loaded", "a conversion is running",
//! "the result is ready" — and a guard against starting a second conversion
//! while one is pending. [`ConvertSession`] models exactly that and nothing
//! more; it holds no buffers and never calls the engine itself, so the two
//! layers stay independently testable.
//!
//! The single-flight policy is **reject**: `begin` while Converting returns
//! [`ConvertError::SessionBusy`] rather than queueing or overlapping. A
//! queue would need unbounded buffering of owned inputs, and overlap makes
//! "which outcome am I seeing" ambiguous for exactly the UI-shaped callers
//! this type exists for.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Lifecycle states of one conversion session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No source loaded.
    #[default]
    Idle,
    /// A source is loaded; a conversion may begin.
    Loaded,
    /// A conversion is in flight. No new conversion may begin.
    Converting,
    /// The last conversion succeeded.
    Converted,
    /// The last conversion failed. A new attempt may begin.
    Failed,
}

/// A caller-owned conversion session.
#[derive(Debug, Default)]
pub struct ConvertSession {
    state: SessionState,
}

impl ConvertSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Load a (new) source, discarding any previous outcome.
    ///
    /// # Errors
    /// [`ConvertError::SessionBusy`] while a conversion is in flight.
    pub fn load(&mut self) -> Result<(), ConvertError> {
        if self.state == SessionState::Converting {
            return Err(ConvertError::SessionBusy);
        }
        self.state = SessionState::Loaded;
        Ok(())
    }

    /// Mark a conversion as started.
    ///
    /// # Errors
    /// [`ConvertError::SessionBusy`] while one is already in flight;
    /// [`ConvertError::Internal`] when no source has been loaded.
    pub fn begin(&mut self) -> Result<(), ConvertError> {
        match self.state {
            SessionState::Converting => Err(ConvertError::SessionBusy),
            SessionState::Idle => Err(ConvertError::Internal(
                "begin() called with no source loaded".to_string(),
            )),
            SessionState::Loaded | SessionState::Converted | SessionState::Failed => {
                self.state = SessionState::Converting;
                Ok(())
            }
        }
    }

    /// Record a successful outcome for the in-flight conversion.
    pub fn complete(&mut self) {
        self.state = SessionState::Converted;
    }

    /// Record a failed outcome for the in-flight conversion.
    pub fn fail(&mut self) {
        self.state = SessionState::Failed;
    }

    /// Discard the loaded source and any outcome.
    pub fn clear(&mut self) {
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_walks_the_states_in_order() {
        let mut session = ConvertSession::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.load().unwrap();
        assert_eq!(session.state(), SessionState::Loaded);

        session.begin().unwrap();
        assert_eq!(session.state(), SessionState::Converting);

        session.complete();
        assert_eq!(session.state(), SessionState::Converted);
    }

    #[test]
    fn begin_while_converting_is_rejected() {
        let mut session = ConvertSession::new();
        session.load().unwrap();
        session.begin().unwrap();

        let err = session.begin().unwrap_err();
        assert!(matches!(err, ConvertError::SessionBusy));
        // The in-flight conversion is unaffected.
        assert_eq!(session.state(), SessionState::Converting);
    }

    #[test]
    fn load_while_converting_is_rejected() {
        let mut session = ConvertSession::new();
        session.load().unwrap();
        session.begin().unwrap();
        assert!(matches!(session.load(), Err(ConvertError::SessionBusy)));
    }

    #[test]
    fn begin_without_a_source_is_an_error() {
        let mut session = ConvertSession::new();
        assert!(matches!(session.begin(), Err(ConvertError::Internal(_))));
    }

    #[test]
    fn failed_conversion_can_be_retried() {
        let mut session = ConvertSession::new();
        session.load().unwrap();
        session.begin().unwrap();
        session.fail();
        assert_eq!(session.state(), SessionState::Failed);

        session.begin().unwrap();
        assert_eq!(session.state(), SessionState::Converting);
    }

    #[test]
    fn loading_a_new_source_resets_a_finished_outcome() {
        let mut session = ConvertSession::new();
        session.load().unwrap();
        session.begin().unwrap();
        session.complete();

        session.load().unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn clear_returns_to_idle_from_anywhere() {
        let mut session = ConvertSession::new();
        session.load().unwrap();
        session.begin().unwrap();
        session.complete();
        session.clear();
        assert_eq!(session.state(), SessionState::Idle);
    }
}
