//! RSVP wizard: step state, the draft and the submission protocol.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::backend::RsvpBackend;
use crate::error::{Error, Result};
use crate::types::{NewRsvpRecord, RecordId};

use super::draft::{RequiredField, RsvpDraft};
use super::notification::Notification;
use super::step::{transition, Transition, WizardEvent, WizardStep};

// ─────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────

/// Result of an accepted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to `StepReport::step`
    Advanced,
    /// Required fields missing; the step did not change
    Invalid { missing: Vec<RequiredField> },
    /// The backend stored the response
    Submitted { record_id: Option<RecordId> },
    /// The backend (or something else) failed; draft and step are intact
    SubmitFailed { message: String },
}

/// What an action did and what to show the guest
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Step after the action
    pub step: WizardStep,
    pub outcome: StepOutcome,
    pub notification: Option<Notification>,
}

impl StepReport {
    fn advanced(step: WizardStep) -> Self {
        Self {
            step,
            outcome: StepOutcome::Advanced,
            notification: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Wizard
// ─────────────────────────────────────────────────────────────────

struct WizardState {
    step: WizardStep,
    draft: RsvpDraft,
    submitting: bool,
    run_id: Uuid,
}

impl WizardState {
    fn new() -> Self {
        Self {
            step: WizardStep::Initial,
            draft: RsvpDraft::default(),
            submitting: false,
            run_id: Uuid::new_v4(),
        }
    }
}

enum Applied {
    Done(StepReport),
    Submit(NewRsvpRecord),
}

/// Clears the in-flight flag when the submission fails or the submitting
/// future is dropped. A successful submission disarms it and clears the flag
/// together with the step change.
struct InFlight<'a> {
    state: &'a Mutex<WizardState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().submitting = false;
        }
    }
}

/// Multi-step RSVP form ending in one backend write.
///
/// All methods take `&self`; the state lock is never held across the
/// backend call, and a second action while a submission is running is
/// refused with `Error::SubmissionInFlight`.
pub struct RsvpWizard {
    backend: Arc<dyn RsvpBackend>,
    state: Mutex<WizardState>,
}

impl RsvpWizard {
    pub fn new(backend: Arc<dyn RsvpBackend>) -> Self {
        let wizard = Self {
            backend,
            state: Mutex::new(WizardState::new()),
        };
        debug!(run_id = %wizard.run_id(), backend = wizard.backend.name(), "RSVP wizard created");
        wizard
    }

    pub fn step(&self) -> WizardStep {
        self.state.lock().step
    }

    /// Snapshot of the draft
    pub fn draft(&self) -> RsvpDraft {
        self.state.lock().draft.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    /// Identifier of the current run, for log correlation only
    pub fn run_id(&self) -> Uuid {
        self.state.lock().run_id
    }

    /// Edit the draft in place.
    pub fn update_draft<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut RsvpDraft),
    {
        let mut state = self.state.lock();
        if state.submitting {
            return Err(Error::SubmissionInFlight);
        }
        if state.step.is_terminal() {
            return Err(Error::InvalidTransition {
                step: state.step.as_str(),
                action: "edit the response",
            });
        }
        edit(&mut state.draft);
        Ok(())
    }

    /// Submit the first step. Declining guests are stored right away.
    pub async fn submit_details(&self) -> Result<StepReport> {
        self.dispatch(WizardEvent::SubmitDetails).await
    }

    /// Continue from diet or song
    pub fn next(&self) -> Result<StepReport> {
        self.navigate(WizardEvent::Continue)
    }

    pub fn back(&self) -> Result<StepReport> {
        self.navigate(WizardEvent::Back)
    }

    /// Send the response from the message step
    pub async fn submit(&self) -> Result<StepReport> {
        self.dispatch(WizardEvent::Submit).await
    }

    /// "Submit another": clear the draft and return to the first step
    pub fn start_over(&self) -> Result<StepReport> {
        self.navigate(WizardEvent::StartOver)
    }

    // ─────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────

    fn navigate(&self, event: WizardEvent) -> Result<StepReport> {
        let mut state = self.state.lock();
        match self.apply(&mut state, event)? {
            Applied::Done(report) => Ok(report),
            Applied::Submit(_) => {
                // Navigation events never map to a submission.
                state.submitting = false;
                Err(Error::Internal(format!(
                    "'{}' unexpectedly started a submission",
                    event.as_str()
                )))
            }
        }
    }

    async fn dispatch(&self, event: WizardEvent) -> Result<StepReport> {
        let (record, run_id, from) = {
            let mut state = self.state.lock();
            match self.apply(&mut state, event)? {
                Applied::Done(report) => return Ok(report),
                Applied::Submit(record) => (record, state.run_id, state.step),
            }
        };
        let guard = InFlight {
            state: &self.state,
            armed: true,
        };

        info!(
            run_id = %run_id,
            step = %from,
            backend = self.backend.name(),
            attendance = %record.attendance,
            "Submitting RSVP"
        );
        let result = self.backend.insert(&record).await;

        match result {
            Ok(created) => {
                let record_id = created.first().and_then(|r| r.id.clone());
                guard.disarm();
                {
                    let mut state = self.state.lock();
                    state.step = WizardStep::Complete;
                    state.submitting = false;
                }
                info!(
                    run_id = %run_id,
                    record_id = ?record_id,
                    backend = self.backend.name(),
                    "RSVP stored"
                );
                Ok(StepReport {
                    step: WizardStep::Complete,
                    outcome: StepOutcome::Submitted { record_id },
                    notification: Some(Notification::submitted()),
                })
            }
            Err(e) => {
                drop(guard);
                Ok(self.failed(from, run_id, e))
            }
        }
    }

    fn failed(&self, step: WizardStep, run_id: Uuid, err: Error) -> StepReport {
        error!(
            run_id = %run_id,
            step = %step,
            backend = self.backend.name(),
            retryable = err.is_retryable(),
            "{}",
            err.format_for_log()
        );
        StepReport {
            step,
            outcome: StepOutcome::SubmitFailed {
                message: err.to_string(),
            },
            notification: Some(Notification::submit_failed(&err)),
        }
    }

    /// Apply `event` under the lock.
    ///
    /// A returned `Applied::Submit` means the in-flight flag is set and the
    /// caller must run the insert.
    fn apply(&self, state: &mut WizardState, event: WizardEvent) -> Result<Applied> {
        if state.submitting {
            warn!(run_id = %state.run_id, action = event.as_str(), "Refused while submitting");
            return Err(Error::SubmissionInFlight);
        }

        let from = state.step;
        let report = match transition(from, event, &state.draft)? {
            Transition::Move(to) => {
                state.step = to;
                debug!(run_id = %state.run_id, from = %from, to = %to, "Wizard step changed");
                StepReport::advanced(to)
            }
            Transition::Reject(missing) => {
                debug!(run_id = %state.run_id, step = %from, missing = ?missing, "RSVP details incomplete");
                StepReport {
                    step: from,
                    notification: Some(Notification::missing_fields(&missing)),
                    outcome: StepOutcome::Invalid { missing },
                }
            }
            Transition::Reset => {
                *state = WizardState::new();
                debug!(run_id = %state.run_id, "Wizard reset for another response");
                StepReport::advanced(WizardStep::Initial)
            }
            Transition::RunSubmission => {
                let record = state.draft.to_record()?;
                state.submitting = true;
                return Ok(Applied::Submit(record));
            }
        };
        Ok(Applied::Done(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::types::Attendance;
    use std::time::Duration;

    fn wizard_with(mock: Arc<MockBackend>) -> RsvpWizard {
        RsvpWizard::new(mock)
    }

    fn fill_details(wizard: &RsvpWizard, attendance: Attendance) {
        wizard
            .update_draft(|d| {
                d.name = "Ada Lovelace".to_string();
                d.email = "ada@example.com".to_string();
                d.phone = "555-0100".to_string();
                d.attendance = Some(attendance);
                d.notifications = true;
            })
            .unwrap();
    }

    async fn walk_to_message(wizard: &RsvpWizard) {
        fill_details(wizard, Attendance::Yes);
        assert_eq!(wizard.submit_details().await.unwrap().step, WizardStep::Diet);
        assert_eq!(wizard.next().unwrap().step, WizardStep::Song);
        assert_eq!(wizard.next().unwrap().step, WizardStep::Message);
    }

    #[tokio::test]
    async fn test_declining_guest_completes_immediately() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        fill_details(&wizard, Attendance::No);

        let report = wizard.submit_details().await.unwrap();
        assert_eq!(report.step, WizardStep::Complete);
        assert!(matches!(report.outcome, StepOutcome::Submitted { record_id: Some(_) }));
        assert_eq!(report.notification.unwrap().title, "RSVP received!");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.inserted()[0].attendance, Attendance::No);
    }

    #[tokio::test]
    async fn test_missing_fields_make_no_backend_call() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        wizard.update_draft(|d| d.name = "Ada".to_string()).unwrap();

        let report = wizard.submit_details().await.unwrap();
        assert_eq!(report.step, WizardStep::Initial);
        assert_eq!(
            report.outcome,
            StepOutcome::Invalid {
                missing: vec![RequiredField::Email, RequiredField::Attendance]
            }
        );
        assert!(report.notification.unwrap().is_destructive());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_attending_guest_walks_every_step() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        walk_to_message(&wizard).await;
        wizard
            .update_draft(|d| {
                d.dietary_restrictions = "vegetarian".to_string();
                d.song_request = "  ".to_string();
                d.message_for_couple = "Congratulations!".to_string();
            })
            .unwrap();
        assert_eq!(mock.call_count(), 0);

        let report = wizard.submit().await.unwrap();
        assert_eq!(report.step, WizardStep::Complete);
        assert_eq!(mock.call_count(), 1);

        let stored = &mock.inserted()[0];
        assert_eq!(stored.attendance, Attendance::Yes);
        assert_eq!(stored.dietary_restrictions.as_deref(), Some("vegetarian"));
        assert_eq!(stored.song_request, None);
        assert_eq!(stored.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_back_navigation_keeps_every_field() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        fill_details(&wizard, Attendance::Yes);
        wizard.submit_details().await.unwrap();
        wizard.update_draft(|d| d.dietary_restrictions = "nut allergy".to_string()).unwrap();
        wizard.next().unwrap();
        wizard.update_draft(|d| d.song_request = "Dancing Queen".to_string()).unwrap();
        wizard.next().unwrap();
        wizard.update_draft(|d| d.message_for_couple = "Cheers".to_string()).unwrap();
        let before = wizard.draft();

        assert_eq!(wizard.back().unwrap().step, WizardStep::Song);
        assert_eq!(wizard.back().unwrap().step, WizardStep::Diet);
        assert_eq!(wizard.back().unwrap().step, WizardStep::Initial);

        assert_eq!(wizard.draft(), before);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_step_and_allows_retry() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        walk_to_message(&wizard).await;
        let draft = wizard.draft();

        mock.fail_next("network timeout");
        let report = wizard.submit().await.unwrap();
        assert_eq!(report.step, WizardStep::Message);
        assert_eq!(wizard.step(), WizardStep::Message);
        assert!(matches!(report.outcome, StepOutcome::SubmitFailed { .. }));
        let notification = report.notification.unwrap();
        assert!(notification.is_destructive());
        assert!(notification.description.contains("network timeout"));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.draft(), draft);

        let retry = wizard.submit().await.unwrap();
        assert_eq!(retry.step, WizardStep::Complete);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_submit_writes_once() {
        let mock = Arc::new(MockBackend::with_latency(Duration::from_millis(50)));
        let wizard = wizard_with(mock.clone());
        walk_to_message(&wizard).await;

        let (first, second) = tokio::join!(wizard.submit(), wizard.submit());
        assert_eq!(first.unwrap().step, WizardStep::Complete);
        assert!(matches!(second, Err(Error::SubmissionInFlight)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_completion_leaves_no_gap_for_other_callers() {
        let mock = Arc::new(MockBackend::with_latency(Duration::from_millis(20)));
        let wizard = Arc::new(wizard_with(mock.clone()));
        walk_to_message(&wizard).await;

        let submitter = {
            let wizard = wizard.clone();
            tokio::spawn(async move { wizard.submit().await })
        };
        while !wizard.is_submitting() && wizard.step() != WizardStep::Complete {
            tokio::task::yield_now().await;
        }
        // Hammer `back` from another thread until the submission settles.
        let rival = {
            let wizard = wizard.clone();
            tokio::task::spawn_blocking(move || loop {
                match wizard.back() {
                    Err(Error::SubmissionInFlight) => std::hint::spin_loop(),
                    other => return other,
                }
            })
        };

        let report = submitter.await.unwrap().unwrap();
        let rival = rival.await.unwrap();
        assert_eq!(report.step, WizardStep::Complete);
        assert!(matches!(rival, Err(Error::InvalidTransition { .. })));
        assert_eq!(wizard.step(), WizardStep::Complete);
        assert!(!wizard.is_submitting());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_actions_refused_while_in_flight() {
        let mock = Arc::new(MockBackend::with_latency(Duration::from_millis(50)));
        let wizard = wizard_with(mock.clone());
        walk_to_message(&wizard).await;

        let check = async {
            tokio::task::yield_now().await;
            assert!(wizard.is_submitting());
            assert!(matches!(wizard.back(), Err(Error::SubmissionInFlight)));
            assert!(matches!(
                wizard.update_draft(|d| d.name.clear()),
                Err(Error::SubmissionInFlight)
            ));
        };
        let (report, ()) = tokio::join!(wizard.submit(), check);
        assert_eq!(report.unwrap().step, WizardStep::Complete);
        assert_eq!(wizard.draft().name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_dropped_submission_clears_flag() {
        let mock = Arc::new(MockBackend::with_latency(Duration::from_secs(30)));
        let wizard = wizard_with(mock.clone());
        walk_to_message(&wizard).await;

        let timed_out = tokio::time::timeout(Duration::from_millis(20), wizard.submit()).await;
        assert!(timed_out.is_err());
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.step(), WizardStep::Message);
    }

    #[tokio::test]
    async fn test_submit_another_resets() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        fill_details(&wizard, Attendance::No);
        wizard.submit_details().await.unwrap();
        let first_run = wizard.run_id();

        assert!(wizard.update_draft(|d| d.name.clear()).is_err());
        assert!(wizard.back().is_err());

        let report = wizard.start_over().unwrap();
        assert_eq!(report.step, WizardStep::Initial);
        assert!(wizard.draft().is_empty());
        assert_ne!(wizard.run_id(), first_run);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_transition_has_no_side_effects() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        fill_details(&wizard, Attendance::Yes);

        assert!(matches!(wizard.submit().await, Err(Error::InvalidTransition { .. })));
        assert!(matches!(wizard.next(), Err(Error::InvalidTransition { .. })));
        assert_eq!(wizard.step(), WizardStep::Initial);
        assert!(!wizard.is_submitting());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_required_field_cleared_later_blocks_submit() {
        let mock = Arc::new(MockBackend::new());
        let wizard = wizard_with(mock.clone());
        walk_to_message(&wizard).await;
        wizard.update_draft(|d| d.email = "not-an-email".to_string()).unwrap();

        let report = wizard.submit().await.unwrap();
        assert_eq!(report.step, WizardStep::Message);
        assert_eq!(
            report.outcome,
            StepOutcome::Invalid {
                missing: vec![RequiredField::Email]
            }
        );
        assert_eq!(mock.call_count(), 0);
    }
}
