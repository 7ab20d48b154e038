//! Supabase backend
//!
//! Inserts RSVP records through the PostgREST endpoint Supabase exposes for
//! each table: `POST {url}/rest/v1/{table}` with `Prefer: return=representation`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::types::{NewRsvpRecord, SubmittedRsvpRecord};

use super::RsvpBackend;

const NAME: &str = "supabase";

// ─────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────

/// Connection settings for a Supabase project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://abcd.supabase.co")
    pub url: String,

    /// Anon or service key, sent as `apikey` and bearer token
    pub api_key: String,

    /// Table receiving the responses
    pub table: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// PostgREST error body
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
    code: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Supabase Backend
// ─────────────────────────────────────────────────────────────────

pub struct SupabaseBackend {
    config: SupabaseConfig,
    client: Client,
    endpoint: Url,
}

impl SupabaseBackend {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let endpoint = build_endpoint(&config.url, &config.table)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(endpoint = %endpoint, "Supabase backend created");

        Ok(Self {
            config,
            client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::BackendTimeout {
                backend: NAME,
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            Error::backend_request(NAME, e.to_string())
        }
    }
}

#[async_trait]
impl RsvpBackend for SupabaseBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn insert(&self, record: &NewRsvpRecord) -> Result<Vec<SubmittedRsvpRecord>> {
        debug!(endpoint = %self.endpoint, "Inserting RSVP");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let message = error_message(&body, status.as_u16());
            warn!(status = %status, message = %message, "Supabase rejected RSVP");
            return Err(Error::backend_rejected(NAME, status.as_u16(), message));
        }

        // The row is stored once the status is 2xx; the representation is
        // informational only.
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Vec<SubmittedRsvpRecord>>(&body) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(status = %status, error = %e, "Stored RSVP but could not decode the returned row");
                Ok(Vec::new())
            }
        }
    }
}

/// `{url}/rest/v1/{table}`, tolerating a trailing slash on the project URL.
fn build_endpoint(base: &str, table: &str) -> Result<Url> {
    let base = Url::parse(base.trim_end_matches('/'))
        .map_err(|e| Error::config_field_invalid("backend.url", format!("Invalid URL '{}': {}", base, e)))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(Error::config_field_invalid(
            "backend.url",
            "Backend URL must start with http:// or https://",
        ));
    }
    base.join(&format!("{}/rest/v1/{}", base.path().trim_end_matches('/'), table))
        .map_err(|e| Error::config_field_invalid("backend.table", e.to_string()))
}

/// Human-readable message from a PostgREST error body.
fn error_message(body: &str, status: u16) -> String {
    if let Ok(err) = serde_json::from_str::<PostgrestError>(body) {
        if let Some(message) = err.message.filter(|m| !m.is_empty()) {
            let mut text = message;
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                text.push_str(&format!(" ({})", details));
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_empty()) {
                text.push_str(&format!(" Hint: {}", hint));
            }
            if let Some(code) = err.code {
                debug!(code = %code, "PostgREST error code");
            }
            return text;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
