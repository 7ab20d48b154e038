//! Core types for the persona system.
//!
//! A persona is one of the three characters a guest can experience the
//! invitation through. It only changes copy and theme, never behaviour.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// The three narrative characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// The bold adventurer.
    Wesley,
    /// Romantic and elegant.
    Heather,
    /// The cat, attending by video call.
    Puffy,
}

/// Current persona choice; `None` until the guest picks one.
pub type PersonaSelection = Option<Persona>;

impl Persona {
    /// Slug used as the persisted value and in CLI args.
    pub fn slug(&self) -> &'static str {
        match self {
            Persona::Wesley => "wesley",
            Persona::Heather => "heather",
            Persona::Puffy => "puffy",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Wesley => "Wesley",
            Persona::Heather => "Heather",
            Persona::Puffy => "Puffy",
        }
    }

    /// All personas in picker order.
    pub fn all() -> &'static [Persona] {
        &[Persona::Wesley, Persona::Heather, Persona::Puffy]
    }

    /// Strict lookup used for persisted values: only an exact slug matches.
    pub fn from_slug(slug: &str) -> Option<Persona> {
        Persona::all().iter().copied().find(|p| p.slug() == slug)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lenient parse for user input (case and surrounding whitespace ignored).
impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Persona::from_slug(&wanted).ok_or_else(|| {
            format!(
                "Unknown character '{}'. Valid: wesley, heather, puffy",
                s
            )
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────

/// Colour palette for a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersonaTheme {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub dark: &'static str,
    /// Gradient stops, e.g. "from-amber-900 via-amber-700 to-yellow-600".
    pub gradient: &'static str,
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
