//! RSVP wizard
//!
//! A linear five-step form: details, diet, song, message, complete. Guests
//! who decline skip straight to completion. The only side effect is one
//! backend insert per run.

mod draft;
mod machine;
mod notification;
mod step;

pub use draft::{looks_like_email, RequiredField, RsvpDraft};
pub use machine::{RsvpWizard, StepOutcome, StepReport};
pub use notification::{Notification, NotificationVariant, SUCCESS_DURATION};
pub use step::{transition, Transition, WizardEvent, WizardStep};
