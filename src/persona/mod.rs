//! Persona system: which character the guest experiences the invitation as.
//!
//! The selection lives in a [`PersonaContext`] backed by a pluggable
//! [`KeyValueStore`]; the [`PersonaRegistry`] holds the static theme and copy
//! tables keyed by persona, plus the event facts every persona shares.

pub mod context;
pub mod registry;
pub mod store;
pub mod types;

pub use context::{PersonaContext, DEFAULT_STORAGE_KEY};
pub use registry::{PersonaListing, PersonaRegistry, RsvpCopy, StepCopy, EVENT};
pub use store::{FileStore, KeyValueStore};
#[cfg(test)]
pub use store::MemoryStore;
pub use types::{Persona, PersonaSelection, PersonaTheme};
