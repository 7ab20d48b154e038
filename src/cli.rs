//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the wedding RSVP console.

use clap::{Args, Parser, Subcommand};

use crate::types::Attendance;

/// Wedding RSVP - character-driven invitation console
///
/// Pick the character you want to hear the invitation from, then answer
/// the RSVP one step at a time.
#[derive(Parser, Debug)]
#[command(name = "wedding-rsvp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "WEDDING_RSVP_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer the RSVP interactively
    Rsvp {
        /// Use this character for the session without changing the saved one
        #[arg(long)]
        persona: Option<String>,
    },

    /// Send a complete RSVP in one go
    Submit(SubmitArgs),

    /// Show the invitation: banner, ceremony, reception and schedule
    Details {
        /// Use this character instead of the saved one
        #[arg(long)]
        persona: Option<String>,
    },

    /// Character selection
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Fields for a non-interactive RSVP
#[derive(Args, Debug, Clone, Default)]
pub struct SubmitArgs {
    /// Guest name
    #[arg(long)]
    pub name: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Attending: yes or no
    #[arg(long)]
    pub attendance: Option<Attendance>,

    /// Opt in to updates about the wedding
    #[arg(long)]
    pub notifications: bool,

    /// Dietary restrictions
    #[arg(long)]
    pub diet: Option<String>,

    /// Song request
    #[arg(long)]
    pub song: Option<String>,

    /// Message for the couple
    #[arg(long)]
    pub message: Option<String>,
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List the available characters
    List,

    /// Show the saved character and its theme
    Show,

    /// Save a character choice
    Select {
        /// Character: wesley, heather, puffy
        persona: String,
    },

    /// Forget the saved character
    Clear,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}
