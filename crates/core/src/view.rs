//! Questionnaire view state.
//!
//! The questionnaire front end moves through four screens. Transitions are explicit so a
//! client cannot, for example, show a report without having submitted the form.
//!
//! ```text
//! Questionnaire --submit--> Loading --report ready--> Report
//!                              |                        |
//!                              +--failed--> Error       |
//!                                             |         |
//! Questionnaire <--------retry----------------+         |
//! Questionnaire <--------start over---------------------+
//! ```

use crate::{ComplianceError, ComplianceResult};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Questionnaire,
    Loading,
    Report,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    Submit,
    ReportReady,
    Failed(String),
    Retry,
    StartOver,
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Questionnaire => "questionnaire",
            ViewState::Loading => "loading",
            ViewState::Report => "report",
            ViewState::Error(_) => "error",
        }
    }

    /// Apply `event`, returning the next state.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceError::InvalidTransition` if the event is not allowed from the
    /// current state.
    pub fn apply(self, event: ViewEvent) -> ComplianceResult<ViewState> {
        match (self, event) {
            (ViewState::Questionnaire, ViewEvent::Submit) => Ok(ViewState::Loading),
            (ViewState::Loading, ViewEvent::ReportReady) => Ok(ViewState::Report),
            (ViewState::Loading, ViewEvent::Failed(message)) => Ok(ViewState::Error(message)),
            (ViewState::Error(_), ViewEvent::Retry) => Ok(ViewState::Questionnaire),
            (ViewState::Report, ViewEvent::StartOver) => Ok(ViewState::Questionnaire),
            (state, event) => Err(ComplianceError::InvalidTransition {
                from: state.name(),
                event: event.name(),
            }),
        }
    }
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::Submit => "submit",
            ViewEvent::ReportReady => "report ready",
            ViewEvent::Failed(_) => "failed",
            ViewEvent::Retry => "retry",
            ViewEvent::StartOver => "start over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_and_start_over() {
        let state = ViewState::default()
            .apply(ViewEvent::Submit)
            .and_then(|s| s.apply(ViewEvent::ReportReady))
            .expect("valid transitions");
        assert_eq!(state, ViewState::Report);

        let state = state.apply(ViewEvent::StartOver).expect("start over");
        assert_eq!(state, ViewState::Questionnaire);
    }

    #[test]
    fn failure_then_retry() {
        let state = ViewState::Loading
            .apply(ViewEvent::Failed("timeout".into()))
            .expect("failed");
        assert_eq!(state, ViewState::Error("timeout".into()));
        assert_eq!(
            state.apply(ViewEvent::Retry).expect("retry"),
            ViewState::Questionnaire
        );
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let err = ViewState::Questionnaire
            .apply(ViewEvent::ReportReady)
            .expect_err("cannot skip loading");
        assert!(matches!(
            err,
            ComplianceError::InvalidTransition {
                from: "questionnaire",
                event: "report ready"
            }
        ));

        assert!(ViewState::Report.apply(ViewEvent::Retry).is_err());
        assert!(ViewState::Error("x".into()).apply(ViewEvent::Submit).is_err());
        assert!(ViewState::Loading.apply(ViewEvent::Submit).is_err());
    }
}
