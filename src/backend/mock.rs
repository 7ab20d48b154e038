//! Mock backend for testing
//!
//! Records every insert and can be scripted to fail or to stall.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::{NewRsvpRecord, SubmittedRsvpRecord};

use super::RsvpBackend;

const NAME: &str = "mock";

// ─────────────────────────────────────────────────────────────────
// Mock Backend Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for mock backend behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Simulated latency per insert
    pub latency: Duration,

    /// Fail every insert with this message
    pub fail_with: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────

pub struct MockBackend {
    config: MockConfig,
    inserted: RwLock<Vec<NewRsvpRecord>>,
    call_count: RwLock<u32>,
    fail_next: RwLock<VecDeque<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            inserted: RwLock::new(Vec::new()),
            call_count: RwLock::new(0),
            fail_next: RwLock::new(VecDeque::new()),
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self::with_config(MockConfig {
            latency,
            ..Default::default()
        })
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            fail_with: Some(message.into()),
            ..Default::default()
        })
    }

    /// Queue a one-shot failure for the next insert
    pub fn fail_next(&self, message: impl Into<String>) {
        self.fail_next.write().push_back(message.into());
    }

    pub fn call_count(&self) -> u32 {
        *self.call_count.read()
    }

    /// Payloads of successful inserts, in order
    pub fn inserted(&self) -> Vec<NewRsvpRecord> {
        self.inserted.read().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RsvpBackend for MockBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn insert(&self, record: &NewRsvpRecord) -> Result<Vec<SubmittedRsvpRecord>> {
        *self.call_count.write() += 1;

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let scripted = self.fail_next.write().pop_front();
        if let Some(message) = scripted.or_else(|| self.config.fail_with.clone()) {
            return Err(Error::backend_request(NAME, message));
        }

        self.inserted.write().push(record.clone());
        Ok(vec![SubmittedRsvpRecord::stamp(record.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attendance;

    fn record() -> NewRsvpRecord {
        NewRsvpRecord {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            attendance: Attendance::No,
            notifications: true,
            dietary_restrictions: None,
            song_request: None,
            message_for_couple: None,
        }
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let mock = MockBackend::new();
        mock.fail_next("network timeout");

        let err = mock.insert(&record()).await.unwrap_err();
        assert_eq!(err.to_string(), "network timeout");
        assert!(mock.insert(&record()).await.is_ok());
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.inserted().len(), 1);
    }

    #[test]
    fn test_failing_always_fails() {
        let mock = MockBackend::failing("down");
        tokio_test::block_on(async {
            assert!(mock.insert(&record()).await.is_err());
            assert!(mock.insert(&record()).await.is_err());
        });
        assert!(mock.inserted().is_empty());
        assert_eq!(mock.call_count(), 2);
    }
}
