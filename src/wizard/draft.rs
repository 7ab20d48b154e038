//! The in-progress RSVP and its validation.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{Attendance, NewRsvpRecord};

/// Fields the first step cannot be submitted without
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredField {
    Name,
    Email,
    Attendance,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Name => "name",
            RequiredField::Email => "email",
            RequiredField::Attendance => "attendance",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the guest has entered so far.
///
/// Text fields hold raw input; blanks are only turned into absent values
/// when the record is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsvpDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub attendance: Option<Attendance>,
    pub notifications: bool,
    pub dietary_restrictions: String,
    pub song_request: String,
    pub message_for_couple: String,
}

impl RsvpDraft {
    pub fn is_empty(&self) -> bool {
        *self == RsvpDraft::default()
    }

    /// Required fields that are missing, in form order.
    ///
    /// A blank name and an email that does not look like an address both
    /// count as missing.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(RequiredField::Name);
        }
        if !looks_like_email(&self.email) {
            missing.push(RequiredField::Email);
        }
        if self.attendance.is_none() {
            missing.push(RequiredField::Attendance);
        }
        missing
    }

    /// Build the insert payload.
    pub fn to_record(&self) -> Result<NewRsvpRecord> {
        let missing = self.missing_fields();
        let attendance = match (self.attendance, missing.is_empty()) {
            (Some(attendance), true) => attendance,
            _ => {
                return Err(Error::ValidationFailed {
                    fields: missing.iter().map(|f| f.as_str().to_string()).collect(),
                })
            }
        };

        Ok(NewRsvpRecord {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional_text(&self.phone),
            attendance,
            notifications: self.notifications,
            dietary_restrictions: optional_text(&self.dietary_restrictions),
            song_request: optional_text(&self.song_request),
            message_for_couple: optional_text(&self.message_for_couple),
        })
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Loose address check: something on both sides of a single `@`, and a dot
/// in the domain.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let draft = RsvpDraft {
            name: "   ".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            draft.missing_fields(),
            vec![RequiredField::Name, RequiredField::Attendance]
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("ada@example.com"));
        assert!(looks_like_email("  ada+rsvp@mail.example.org "));
        assert!(!looks_like_email(""));
        assert!(!looks_like_email("ada"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ada@"));
        assert!(!looks_like_email("ada@localhost"));
        assert!(!looks_like_email("a@b@example.com"));
        assert!(!looks_like_email("ada lovelace@example.com"));
    }

    #[test]
    fn test_record_normalizes_blanks() {
        let draft = RsvpDraft {
            name: " Ada ".to_string(),
            email: "ada@example.com".to_string(),
            phone: "".to_string(),
            attendance: Some(Attendance::Yes),
            notifications: true,
            dietary_restrictions: "   ".to_string(),
            song_request: " September ".to_string(),
            message_for_couple: "\n".to_string(),
        };
        let record = draft.to_record().unwrap();
        assert_eq!(record.name, "Ada");
        assert_eq!(record.phone, None);
        assert_eq!(record.dietary_restrictions, None);
        assert_eq!(record.song_request.as_deref(), Some("September"));
        assert_eq!(record.message_for_couple, None);
        assert!(record.notifications);
    }

    #[test]
    fn test_record_requires_fields() {
        let err = RsvpDraft::default().to_record().unwrap_err();
        match err {
            Error::ValidationFailed { fields } => {
                assert_eq!(fields, vec!["name", "email", "attendance"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
