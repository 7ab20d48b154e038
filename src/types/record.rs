//! RSVP record definitions
//!
//! `NewRsvpRecord` is the payload handed to a backend; `SubmittedRsvpRecord`
//! is what the backend stored. Field names match the `rsvp_responses` columns.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────
// Attendance
// ─────────────────────────────────────────────────────────────────

/// Whether the guest will attend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    /// "Yes I'll be there!"
    Yes,
    /// "Unfortunately, I can't make it"
    No,
}

impl Attendance {
    /// Wire value stored by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Attendance::Yes => "yes",
            Attendance::No => "no",
        }
    }

    /// Label shown next to the choice
    pub fn label(&self) -> &'static str {
        match self {
            Attendance::Yes => "Yes I'll be there!",
            Attendance::No => "Unfortunately, I can't make it",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attendance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(Attendance::Yes),
            "no" | "n" => Ok(Attendance::No),
            other => Err(format!("Unknown attendance '{}'. Valid: yes, no", other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────

/// Payload for a single insert into the RSVP collection.
///
/// Optional text is `None` when the guest left it blank; it serializes as
/// `null`, never as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRsvpRecord {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub attendance: Attendance,
    pub notifications: bool,
    pub dietary_restrictions: Option<String>,
    pub song_request: Option<String>,
    pub message_for_couple: Option<String>,
}

/// Server-assigned row identifier.
///
/// Hosted tables commonly use an integer key; the file backend stamps UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// A record as persisted by the backend.
///
/// Server columns are optional so that any stored row is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRsvpRecord {
    /// Server-assigned identifier
    #[serde(default)]
    pub id: Option<RecordId>,

    /// Server-assigned creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub record: NewRsvpRecord,
}

impl SubmittedRsvpRecord {
    /// Stamp a payload with a fresh identifier and the current time
    pub fn stamp(record: NewRsvpRecord) -> Self {
        Self {
            id: Some(Uuid::new_v4().into()),
            created_at: Some(Utc::now()),
            record,
        }
    }
}
