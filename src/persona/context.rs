//! Persona context: the single active character selection.
//!
//! Loaded once from the key-value store, written through on every change.
//! Anything unreadable or outside the known set loads as "no selection".

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::Result;

use super::store::KeyValueStore;
use super::types::{Persona, PersonaSelection};

/// Storage key holding the selected persona slug.
pub const DEFAULT_STORAGE_KEY: &str = "wedding-character";

/// Holds the active persona and persists changes.
pub struct PersonaContext {
    store: Arc<dyn KeyValueStore>,
    key: String,
    selection: RwLock<PersonaSelection>,
}

impl PersonaContext {
    /// Initialize from storage under `key`.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let selection = match store.get(&key) {
            Ok(Some(value)) => match Persona::from_slug(&value) {
                Some(persona) => {
                    debug!(persona = %persona.slug(), "Restored saved character");
                    Some(persona)
                }
                None => {
                    debug!(value = %value, "Ignoring unknown saved character");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e.format_for_log(), "Could not read saved character");
                None
            }
        };

        Self {
            store,
            key,
            selection: RwLock::new(selection),
        }
    }

    /// Initialize with the default storage key.
    pub fn with_default_key(store: Arc<dyn KeyValueStore>) -> Self {
        Self::load(store, DEFAULT_STORAGE_KEY)
    }

    /// Current selection.
    pub fn get_selection(&self) -> PersonaSelection {
        *self.selection.read()
    }

    /// Whether the picker has to be shown before anything themed renders.
    pub fn needs_picker(&self) -> bool {
        self.get_selection().is_none()
    }

    /// Select a persona and persist it.
    ///
    /// Re-selecting the current persona does not touch storage. The in-memory
    /// selection changes even if the write fails; the error is returned so the
    /// caller can report that it will not survive a reload.
    pub fn select(&self, persona: Persona) -> Result<()> {
        let mut selection = self.selection.write();
        if *selection == Some(persona) {
            return Ok(());
        }
        *selection = Some(persona);
        self.store.set(&self.key, persona.slug())?;
        info!(persona = %persona.slug(), "Character selected");
        Ok(())
    }

    /// Forget the selection, in memory and in storage.
    pub fn clear(&self) -> Result<()> {
        let mut selection = self.selection.write();
        *selection = None;
        self.store.remove(&self.key)?;
        info!("Character selection cleared");
        Ok(())
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::persona::store::{FileStore, MemoryStore};
    use tempfile::TempDir;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Internal("store unavailable".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Internal("store unavailable".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Internal("store unavailable".to_string()))
        }
    }

    #[test]
    fn test_starts_unset() {
        let ctx = PersonaContext::with_default_key(Arc::new(MemoryStore::new()));
        assert_eq!(ctx.get_selection(), None);
        assert!(ctx.needs_picker());
    }

    #[test]
    fn test_selection_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        let ctx = PersonaContext::with_default_key(store.clone());
        ctx.select(Persona::Puffy).unwrap();

        let reloaded = PersonaContext::with_default_key(store);
        assert_eq!(reloaded.get_selection(), Some(Persona::Puffy));
        assert!(!reloaded.needs_picker());
    }

    #[test]
    fn test_corrupt_value_loads_as_unset() {
        let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "dragon"));
        let ctx = PersonaContext::with_default_key(store);
        assert_eq!(ctx.get_selection(), None);
        assert!(ctx.needs_picker());
    }

    #[test]
    fn test_select_same_persona_writes_once() {
        let store = Arc::new(MemoryStore::new());
        let ctx = PersonaContext::with_default_key(store.clone());

        ctx.select(Persona::Heather).unwrap();
        ctx.select(Persona::Heather).unwrap();
        assert_eq!(store.write_count(), 1);

        ctx.select(Persona::Wesley).unwrap();
        assert_eq!(store.write_count(), 2);
        assert_eq!(
            store.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some("wesley")
        );
    }

    #[test]
    fn test_unreadable_storage_loads_as_unset() {
        let ctx = PersonaContext::with_default_key(Arc::new(BrokenStore));
        assert_eq!(ctx.get_selection(), None);
    }

    #[test]
    fn test_failed_write_keeps_session_selection() {
        let ctx = PersonaContext::with_default_key(Arc::new(BrokenStore));
        assert!(ctx.select(Persona::Wesley).is_err());
        assert_eq!(ctx.get_selection(), Some(Persona::Wesley));
    }

    #[test]
    fn test_clear() {
        let store = Arc::new(MemoryStore::new());
        let ctx = PersonaContext::with_default_key(store.clone());
        ctx.select(Persona::Wesley).unwrap();
        ctx.clear().unwrap();
        assert_eq!(ctx.get_selection(), None);

        let reloaded = PersonaContext::with_default_key(store);
        assert_eq!(reloaded.get_selection(), None);
    }

    #[test]
    fn test_custom_key_with_file_store() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(tmp.path()));
        let ctx = PersonaContext::load(store.clone(), "guest-character");
        ctx.select(Persona::Heather).unwrap();
        assert_eq!(ctx.key(), "guest-character");

        assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap(), None);
        let reloaded = PersonaContext::load(Arc::new(FileStore::new(tmp.path())), "guest-character");
        assert_eq!(reloaded.get_selection(), Some(Persona::Heather));
    }
}
