//! Toast-style messages produced by wizard actions.

use std::fmt;
use std::time::Duration;

use crate::error::Error;

use super::draft::RequiredField;

/// How long the success toast stays up
pub const SUCCESS_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    /// `None` keeps the notification until dismissed
    pub duration: Option<Duration>,
}

impl Notification {
    fn destructive(title: &str, description: String) -> Self {
        Self {
            title: title.to_string(),
            description,
            variant: NotificationVariant::Destructive,
            duration: None,
        }
    }

    pub fn missing_fields(missing: &[RequiredField]) -> Self {
        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        Self::destructive(
            "Missing information",
            format!("Please fill in all required fields. Missing: {}", names.join(", ")),
        )
    }

    pub fn submitted() -> Self {
        Self {
            title: "RSVP received!".to_string(),
            description: "Thank you for your response. We'll be in touch with more details soon!"
                .to_string(),
            variant: NotificationVariant::Default,
            duration: Some(SUCCESS_DURATION),
        }
    }

    /// Backend failures show the backend's message; anything else is generic.
    pub fn submit_failed(err: &Error) -> Self {
        if err.is_backend_failure() {
            Self::destructive(
                "Error",
                format!("There was a problem saving your RSVP: {}", err),
            )
        } else {
            Self::destructive(
                "Error",
                "There was an unexpected problem. Please try again.".to_string(),
            )
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
