//! Local file backend
//!
//! Appends each response as one JSON line to `<data_dir>/<table>.jsonl`.
//! Used when no hosted backend is configured, and by the CLI tests.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{NewRsvpRecord, SubmittedRsvpRecord};

use super::RsvpBackend;

const NAME: &str = "file";

pub struct FileBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Backend writing to `<dir>/<table>.jsonl`
    pub fn new(dir: impl AsRef<Path>, table: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.jsonl", table)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every stored record (test helper; the wizard never reads).
    #[cfg(test)]
    pub async fn read_all(&self) -> Result<Vec<SubmittedRsvpRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(Error::from))
            .collect()
    }
}

#[async_trait]
impl RsvpBackend for FileBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn insert(&self, record: &NewRsvpRecord) -> Result<Vec<SubmittedRsvpRecord>> {
        let stored = SubmittedRsvpRecord::stamp(record.clone());
        let line = serde_json::to_string(&stored)?;
        let write_err = |e: std::io::Error| Error::backend_request(NAME, format!("{}: {}", self.path.display(), e));

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::backend_request(NAME, format!("{}: {}", parent.display(), e)))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_err)?;
        let len = file.metadata().await.map_err(write_err)?.len();

        // One write per record; a dangling partial line gets its own line end.
        let mut buf = Vec::with_capacity(line.len() + 2);
        if len > 0 && !ends_with_newline(&mut file, len).await.map_err(write_err)? {
            warn!(path = %self.path.display(), "Terminating a partial line left by an earlier write");
            buf.push(b'\n');
        }
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let written = match file.write_all(&buf).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(trunc) = file.set_len(len).await {
                warn!(path = %self.path.display(), error = %trunc, "Could not roll back a partial write");
            }
            return Err(write_err(e));
        }

        debug!(id = ?stored.id, path = %self.path.display(), "RSVP appended");
        Ok(vec![stored])
    }
}

async fn ends_with_newline(file: &mut tokio::fs::File, len: u64) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1)).await?;
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attendance;
    use tempfile::TempDir;

    fn record(name: &str) -> NewRsvpRecord {
        NewRsvpRecord {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: Some("555-0100".to_string()),
            attendance: Attendance::Yes,
            notifications: false,
            dietary_restrictions: None,
            song_request: Some("September".to_string()),
            message_for_couple: None,
        }
    }

    #[tokio::test]
    async fn test_insert_appends_lines() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::new(tmp.path().join("data"), "rsvp_responses");

        let first = backend.insert(&record("Ada")).await.unwrap();
        let second = backend.insert(&record("Grace")).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_ne!(first[0].id, second[0].id);

        let stored = backend.read_all().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].record.name, "Ada");
        assert_eq!(stored[1].record.song_request.as_deref(), Some("September"));
        assert!(backend.path().ends_with("rsvp_responses.jsonl"));
    }

    #[tokio::test]
    async fn test_absent_fields_stored_as_null() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::new(tmp.path(), "rsvp_responses");
        backend.insert(&record("Ada")).await.unwrap();

        let raw = std::fs::read_to_string(backend.path()).unwrap();
        assert!(raw.contains(r#""dietary_restrictions":null"#));
        assert!(!raw.contains(r#""""#));
    }

    #[tokio::test]
    async fn test_partial_line_does_not_swallow_next_record() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::new(tmp.path(), "rsvp_responses");
        std::fs::write(backend.path(), r#"{"name":"Ad"#).unwrap();

        backend.insert(&record("Grace")).await.unwrap();

        let raw = std::fs::read_to_string(backend.path()).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"name":"Ad"#);
        let stored: SubmittedRsvpRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(stored.record.name, "Grace");
        assert!(raw.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_backend_failure() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the directory should be.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let backend = FileBackend::new(&blocker, "rsvp_responses");
        let err = backend.insert(&record("Ada")).await.unwrap_err();
        assert!(err.is_backend_failure());
    }
}
