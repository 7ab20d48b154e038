//! Backend module for persisting RSVP responses
//!
//! This module provides the storage abstraction the wizard submits to
//! and the implementations selectable from configuration.

mod traits;
mod file;
mod supabase;

#[cfg(test)]
mod mock;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::BackendSettings;
use crate::error::{Error, Result};

pub use traits::*;
pub use file::FileBackend;
pub use supabase::{SupabaseBackend, SupabaseConfig};

#[cfg(test)]
pub use mock::{MockBackend, MockConfig};

/// Build the backend described by `settings`.
///
/// `data_dir` is where the file backend keeps its `.jsonl` table.
pub fn create_backend(settings: &BackendSettings, data_dir: &Path) -> Result<Arc<dyn RsvpBackend>> {
    let backend: Arc<dyn RsvpBackend> = match settings.kind {
        BackendKind::File => {
            let file = FileBackend::new(data_dir, &settings.table);
            debug!(path = %file.path().display(), "Appending responses to file");
            Arc::new(file)
        }
        BackendKind::Supabase => {
            let url = settings
                .url
                .clone()
                .ok_or_else(|| Error::config_field_invalid("backend.url", "required for the supabase backend"))?;
            let api_key = settings
                .api_key
                .clone()
                .ok_or_else(|| Error::config_field_invalid("backend.api_key", "required for the supabase backend"))?;
            Arc::new(SupabaseBackend::new(SupabaseConfig {
                url,
                api_key,
                table: settings.table.clone(),
                timeout_secs: settings.timeout_secs,
            })?)
        }
    };

    info!(backend = backend.name(), table = %settings.table, "RSVP backend ready");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_file_backend_by_default() {
        let tmp = TempDir::new().unwrap();
        let backend = create_backend(&BackendSettings::default(), tmp.path()).unwrap();
        assert_eq!(backend.name(), "file");
    }

    #[test]
    fn test_supabase_requires_url_and_key() {
        let tmp = TempDir::new().unwrap();
        let settings = BackendSettings {
            kind: BackendKind::Supabase,
            ..Default::default()
        };
        let err = create_backend(&settings, tmp.path()).err().unwrap();
        assert_eq!(err.code().as_str(), "E102");
    }
}
