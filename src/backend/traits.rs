//! Backend trait definitions
//!
//! Defines the RsvpBackend trait that every persisted-record store implements.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{NewRsvpRecord, SubmittedRsvpRecord};

// ─────────────────────────────────────────────────────────────────
// Backend Kind
// ─────────────────────────────────────────────────────────────────

/// Which backend implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Append-only JSON lines file in the data directory
    File,
    /// Hosted Supabase (PostgREST) table
    Supabase,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::Supabase => "supabase",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(BackendKind::File),
            "supabase" => Ok(BackendKind::Supabase),
            other => Err(format!("Unknown backend '{}'. Valid: file, supabase", other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// RsvpBackend Trait
// ─────────────────────────────────────────────────────────────────

/// Durable store for RSVP responses.
///
/// The wizard only ever inserts. Implementations must not retry on their own:
/// a failure is reported to the guest, who decides whether to submit again.
#[async_trait]
pub trait RsvpBackend: Send + Sync {
    /// Short backend name for logs (e.g., "file", "supabase")
    fn name(&self) -> &'static str;

    /// Insert one record and return what was stored.
    ///
    /// Failures carry a human-readable message in a backend error variant.
    async fn insert(&self, record: &NewRsvpRecord) -> Result<Vec<SubmittedRsvpRecord>>;
}
