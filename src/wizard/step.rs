//! Wizard steps, guest actions and the transition table.
//!
//! `transition` is a pure function of the current step, the action and the
//! draft. It never touches the backend; the machine carries out whatever it
//! returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::draft::{RequiredField, RsvpDraft};
use crate::types::Attendance;

// ─────────────────────────────────────────────────────────────────
// Steps
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    /// Name, contact details and attendance
    Initial,
    /// Dietary restrictions
    Diet,
    /// Song request
    Song,
    /// Message for the couple
    Message,
    /// Response stored
    Complete,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Initial => "initial",
            WizardStep::Diet => "diet",
            WizardStep::Song => "song",
            WizardStep::Message => "message",
            WizardStep::Complete => "complete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStep::Complete)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────

/// Something the guest did on the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    /// Submit the details form on the first step
    SubmitDetails,
    /// Continue from an optional step
    Continue,
    /// Go back one step
    Back,
    /// Send the response from the last step
    Submit,
    /// "Submit another" from the completion screen
    StartOver,
}

impl WizardEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardEvent::SubmitDetails => "submit details",
            WizardEvent::Continue => "continue",
            WizardEvent::Back => "go back",
            WizardEvent::Submit => "submit",
            WizardEvent::StartOver => "start over",
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Transitions
// ─────────────────────────────────────────────────────────────────

/// What the machine has to do for an accepted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Move to another step; no side effects
    Move(WizardStep),
    /// Stay put; these required fields are missing
    Reject(Vec<RequiredField>),
    /// Store the draft, then move to `Complete`
    RunSubmission,
    /// Clear the draft and go back to `Initial`
    Reset,
}

/// Decide what `event` does on `step`.
///
/// Pairs outside the table are rejected with `Error::InvalidTransition`.
pub fn transition(step: WizardStep, event: WizardEvent, draft: &RsvpDraft) -> Result<Transition> {
    use WizardEvent::*;
    use WizardStep::*;

    let next = match (step, event) {
        (Initial, SubmitDetails) => {
            let missing = draft.missing_fields();
            if !missing.is_empty() {
                Transition::Reject(missing)
            } else if draft.attendance == Some(Attendance::No) {
                Transition::RunSubmission
            } else {
                Transition::Move(Diet)
            }
        }
        (Diet, Continue) => Transition::Move(Song),
        (Diet, Back) => Transition::Move(Initial),
        (Song, Continue) => Transition::Move(Message),
        (Song, Back) => Transition::Move(Diet),
        (Message, Submit) => {
            // Required fields can still be edited after the first step.
            let missing = draft.missing_fields();
            if missing.is_empty() {
                Transition::RunSubmission
            } else {
                Transition::Reject(missing)
            }
        }
        (Message, Back) => Transition::Move(Song),
        (Complete, StartOver) => Transition::Reset,
        _ => {
            return Err(Error::InvalidTransition {
                step: step.as_str(),
                action: event.as_str(),
            })
        }
    };

    Ok(next)
}
