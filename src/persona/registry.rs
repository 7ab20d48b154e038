//! Bundled persona registry: theme and copy tables for each character.

use crate::wizard::WizardStep;

use super::types::{Persona, PersonaTheme};

/// Copy shown on the RSVP steps for one persona.
#[derive(Debug, Clone, Copy)]
pub struct RsvpCopy {
    pub title: &'static str,
    pub description: &'static str,
    pub submit_text: &'static str,
    pub diet_title: &'static str,
    pub diet_description: &'static str,
    pub song_title: &'static str,
    pub song_description: &'static str,
    pub message_title: &'static str,
    pub message_description: &'static str,
}

/// Resolved heading, blurb and background for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCopy {
    pub title: &'static str,
    pub description: &'static str,
    pub background: Option<String>,
}

const WESLEY_COPY: RsvpCopy = RsvpCopy {
    title: "Join our quest",
    description: "Will you answer the call to adventure? Your presence would make our quest complete! When you RSVP, your room will be reserved for you at Makoa Resorts for the entire weekend.",
    submit_text: "Send RSVP",
    diet_title: "Feast Preparations",
    diet_description: "Every great quest requires proper nourishment! Let us know about any dietary restrictions so our chefs can prepare accordingly.",
    song_title: "Battle Soundtrack",
    song_description: "What epic song should accompany our celebration? Help us craft the perfect playlist for our victory dance!",
    message_title: "Words for the Heroes",
    message_description: "Share your wisdom or well wishes for the brave adventurers embarking on this new quest together!",
};

const HEATHER_COPY: RsvpCopy = RsvpCopy {
    title: "Please join us",
    description: "Your presence would make our special day even more beautiful and meaningful. When you RSVP, your room will be reserved for you at Makoa Resorts for the entire weekend.",
    submit_text: "Send RSVP",
    diet_title: "Dining Preferences",
    diet_description: "We want to ensure every detail is perfect! Please let us know about any dietary restrictions so we can accommodate your needs beautifully.",
    song_title: "Musical Requests",
    song_description: "Music fills our hearts with joy! Do you have a special song that would make our celebration even more magical?",
    message_title: "Sweet Messages",
    message_description: "We would love to hear your thoughts and well wishes as we begin this beautiful journey together!",
};

const PUFFY_COPY: RsvpCopy = RsvpCopy {
    title: "Are you coming?",
    description: "Please say yes! It won't be the same without you (and I need someone to share snacks with). When you RSVP, your room will be reserved for you at Makoa Resorts for the entire weekend.",
    submit_text: "Send RSVP",
    diet_title: "Snack Compatibility Check",
    diet_description: "Important intel needed! Any food restrictions I should know about? I'm planning our snack strategy and need all the details.",
    song_title: "Playlist Contributions",
    song_description: "What should we add to the ultimate party playlist? I've been taking notes on everyone's favorites (don't ask how).",
    message_title: "Secret Messages",
    message_description: "Psst... got any special words for the happy couple? I promise to deliver them (after reading them first, obviously).",
};

/// Landing banner copy for one persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroCopy {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub call_to_action: &'static str,
}

/// Event-details section copy for one persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsCopy {
    pub section_title: &'static str,
    pub ceremony_title: &'static str,
    pub ceremony_description: &'static str,
    pub reception_title: &'static str,
    pub reception_description: &'static str,
    pub schedule_title: &'static str,
}

/// One day of the wedding weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDay {
    pub date: &'static str,
    pub headline: &'static str,
    pub detail: &'static str,
    /// The wedding day itself
    pub highlight: bool,
}

/// Facts shared by every persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFacts {
    pub dates: &'static str,
    pub location: &'static str,
    pub ceremony_time: &'static str,
    pub reception_time: &'static str,
    pub venue: &'static str,
    pub schedule: &'static [ScheduleDay],
}

pub const EVENT: EventFacts = EventFacts {
    dates: "December 5-9, 2025",
    location: "Maui, Hawaii",
    ceremony_time: "Saturday, December 6th at 4:00 PM",
    reception_time: "Saturday, December 6th at 7:00 PM",
    venue: "Makoa Resorts, 2121 Ili' Ili Road, Kihei, HI",
    schedule: &[
        ScheduleDay {
            date: "Friday, Dec 5",
            headline: "Welcome & Arrival Day",
            detail: "Casual Evening Gathering",
            highlight: false,
        },
        ScheduleDay {
            date: "Saturday, Dec 6",
            headline: "THE BIG DAY!",
            detail: "Ceremony & Reception",
            highlight: true,
        },
        ScheduleDay {
            date: "Sunday, Dec 7",
            headline: "Adventure Day",
            detail: "Excursions & Sunset Cruise",
            highlight: false,
        },
        ScheduleDay {
            date: "Monday, Dec 8",
            headline: "Recovery & Farewell",
            detail: "Brunch & Departure",
            highlight: false,
        },
    ],
};

/// Registry of the bundled persona tables.
///
/// Pure data: nothing here decides anything, callers look values up by persona.
pub struct PersonaRegistry {
    asset_base: String,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::with_asset_base("lovable-uploads")
    }

    /// Use a different prefix for background image paths.
    pub fn with_asset_base(asset_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Colour palette for a persona.
    pub fn theme(&self, persona: Persona) -> PersonaTheme {
        match persona {
            Persona::Wesley => PersonaTheme {
                primary: "#8B4513",
                secondary: "#DAA520",
                accent: "#CD853F",
                dark: "#654321",
                gradient: "from-amber-900 via-amber-700 to-yellow-600",
            },
            Persona::Heather => PersonaTheme {
                primary: "#9370DB",
                secondary: "#DDA0DD",
                accent: "#E6E6FA",
                dark: "#663399",
                gradient: "from-purple-900 via-purple-600 to-pink-400",
            },
            Persona::Puffy => PersonaTheme {
                primary: "#FF6B35",
                secondary: "#FFD700",
                accent: "#FFEAA7",
                dark: "#CC5500",
                gradient: "from-orange-800 via-orange-500 to-yellow-400",
            },
        }
    }

    /// One-line pitch shown in the character picker.
    pub fn description(&self, persona: Persona) -> &'static str {
        match persona {
            Persona::Wesley => "Experience the quest through the eyes of a bold adventurer. Action-packed details and epic perspectives await!",
            Persona::Heather => "Discover the celebration through romantic and elegant details. Perfect for those who love the finer touches.",
            Persona::Puffy => "I may be stuck at home, but I've thoroughly investigated every corner via video calls. Trust me, I know where the good stuff is.",
        }
    }

    /// RSVP copy table for a persona.
    pub fn rsvp_copy(&self, persona: Persona) -> &'static RsvpCopy {
        match persona {
            Persona::Wesley => &WESLEY_COPY,
            Persona::Heather => &HEATHER_COPY,
            Persona::Puffy => &PUFFY_COPY,
        }
    }

    /// Heading, blurb and background for a wizard step.
    pub fn step_copy(&self, persona: Persona, step: WizardStep) -> StepCopy {
        let copy = self.rsvp_copy(persona);
        let (title, description) = match step {
            WizardStep::Initial => (copy.title, copy.description),
            WizardStep::Diet => (copy.diet_title, copy.diet_description),
            WizardStep::Song => (copy.song_title, copy.song_description),
            WizardStep::Message => (copy.message_title, copy.message_description),
            WizardStep::Complete => (
                "Thank you!",
                "Your RSVP has been received. We can't wait to celebrate with you!",
            ),
        };
        StepCopy {
            title,
            description,
            background: self.step_background(persona, step),
        }
    }

    /// Landing banner copy.
    pub fn hero(&self, persona: Persona) -> HeroCopy {
        match persona {
            Persona::Wesley => HeroCopy {
                title: "The epic quest begins",
                subtitle: "Join Wesley & Heather for the ultimate adventure",
                description: "Gear up for a legendary celebration in the mystical lands of Maui! Our quest spans four epic days of adventure, romance, and unforgettable memories.",
                call_to_action: "Join the quest",
            },
            Persona::Heather => HeroCopy {
                title: "A love story unfolds",
                subtitle: "Wesley & Heather's romantic journey",
                description: "Experience the magic of true love in paradise. Our wedding celebration is a beautiful tapestry of romance, elegance, and cherished moments with our dearest friends and family.",
                call_to_action: "Share our joy",
            },
            Persona::Puffy => HeroCopy {
                title: "The best party ever!",
                subtitle: "Wesley & Heather (and Puffy's) big day",
                description: "Four whole days of fun, food, and festivities! I've personally inspected all the cozy spots and can confirm - this will be the most comfortable and delicious celebration ever.",
                call_to_action: "Count me in!",
            },
        }
    }

    /// Banner image behind the hero copy.
    pub fn hero_background(&self, persona: Persona) -> String {
        let file = match persona {
            Persona::Wesley => "30a58018-bcb5-4eef-9456-61020c703a8d.png",
            Persona::Heather => "5d08c86f-adac-4c7c-b094-5e623d2855fa.png",
            Persona::Puffy => "761e38ab-93b7-4a7b-9263-808af8dd5be1.png",
        };
        format!("{}/{}", self.asset_base, file)
    }

    /// Ceremony, reception and schedule headings.
    pub fn details(&self, persona: Persona) -> DetailsCopy {
        match persona {
            Persona::Wesley => DetailsCopy {
                section_title: "The quest details",
                ceremony_title: "The sacred ceremony",
                ceremony_description: "Where our epic tale officially begins! Witness the joining of two adventurers in a ceremony worthy of legend.",
                reception_title: "The victory feast",
                reception_description: "Celebrate our triumph with an evening of feasting, dancing, and tales of glory under the Maui stars!",
                schedule_title: "The four-day campaign",
            },
            Persona::Heather => DetailsCopy {
                section_title: "Wedding celebration",
                ceremony_title: "Our sacred vows",
                ceremony_description: "Join us as we exchange heartfelt promises in paradise, surrounded by the natural beauty of Maui and our cherished loved ones.",
                reception_title: "Evening reception",
                reception_description: "Dance the night away with us as we celebrate our new beginning with elegant dining, music, and romantic moments.",
                schedule_title: "Weekend itinerary",
            },
            Persona::Puffy => DetailsCopy {
                section_title: "The fun stuff!",
                ceremony_title: "The important part",
                ceremony_description: "This is when Wesley and Heather make it official! I'll be supervising remotely from my favorite sunny spot in Austin TX.",
                reception_title: "The really fun part",
                reception_description: "Dancing, treats, and lots of celebrating! I've heard there will be excellent food and plenty of cozy places to rest.",
                schedule_title: "Four days of activities",
            },
        }
    }

    /// Background image for a step; the completion screen has none.
    pub fn step_background(&self, persona: Persona, step: WizardStep) -> Option<String> {
        let index = match step {
            WizardStep::Initial => 1,
            WizardStep::Diet => 2,
            WizardStep::Song => 3,
            WizardStep::Message => 4,
            WizardStep::Complete => return None,
        };
        Some(format!("{}/{}{}.png", self.asset_base, persona.slug(), index))
    }

    /// List every persona with its picker blurb.
    pub fn list_available(&self) -> Vec<PersonaListing> {
        Persona::all()
            .iter()
            .map(|p| PersonaListing {
                persona: *p,
                description: self.description(*p),
            })
            .collect()
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of an available persona.
#[derive(Debug, Clone)]
pub struct PersonaListing {
    pub persona: Persona,
    pub description: &'static str,
}
