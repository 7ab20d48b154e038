//! Type definitions for wedding-rsvp
//!
//! Records exchanged with the RSVP backend.

mod record;

pub use record::*;
