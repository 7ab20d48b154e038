//! Wedding RSVP - character-driven wedding invitation
//!
//! This is the main entry point for the wedding-rsvp binary.
//! Guests pick a character, then answer the RSVP one step at a time;
//! responses are stored through the configured backend.

mod backend;
mod cli;
mod config;
mod console;
mod error;
mod logging;
mod persona;
mod types;
mod version;
mod wizard;

use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use crate::backend::create_backend;
use crate::cli::{Cli, Commands, ConfigSubcommand, PersonaSubcommand, SubmitArgs};
use crate::config::AppConfig;
use crate::console::Console;
use crate::error::{Error, Result};
use crate::persona::{FileStore, Persona, PersonaContext, PersonaRegistry};
use crate::wizard::{RsvpDraft, RsvpWizard, StepOutcome};

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that don't need full logging
    match cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { ref subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone(), cli.config.as_deref());
        }
        _ => {}
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::BuildInfo::current();
    debug!(
        version = %build.full_version(),
        data_dir = %config.site.data_dir,
        backend = %config.backend.kind,
        "Starting wedding-rsvp"
    );

    match cli.command {
        Commands::Persona { subcommand } => handle_persona_command(subcommand, &config),
        Commands::Rsvp { persona } => block_on(run_rsvp(&config, persona)),
        Commands::Submit(args) => block_on(run_submit(&config, args)),
        Commands::Details { persona } => show_details(&config, persona),
        // Handled above
        Commands::Version | Commands::Config { .. } => Ok(()),
    }
}

/// Run a future on a single-threaded runtime; the only await is the backend insert.
fn block_on<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;
    runtime.block_on(future)
}

fn persona_context(config: &AppConfig) -> PersonaContext {
    let store = Arc::new(FileStore::new(config.data_dir()));
    debug!(path = %store.path().display(), "Persona storage");
    PersonaContext::load(store, config.persona.storage_key.clone())
}

fn parse_persona(value: &str) -> Result<Persona> {
    value.parse().map_err(|_| Error::UnknownPersona {
        value: value.to_string(),
    })
}

// ─────────────────────────────────────────────────────────────────
// RSVP
// ─────────────────────────────────────────────────────────────────

/// Interactive RSVP on stdin/stdout
async fn run_rsvp(config: &AppConfig, persona_override: Option<String>) -> Result<()> {
    let registry = PersonaRegistry::new();
    let context = persona_context(config);
    let backend = create_backend(&config.backend, &config.data_dir())?;
    let wizard = RsvpWizard::new(backend);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock(), &registry, &config.site.title);

    let persona = match persona_override {
        Some(ref value) => parse_persona(value)?,
        None if context.needs_picker() => {
            console.pick_persona(&context)?.ok_or(Error::PersonaNotSelected)?
        }
        None => context.get_selection().ok_or(Error::PersonaNotSelected)?,
    };

    info!(persona = %persona.slug(), run_id = %wizard.run_id(), "RSVP session started");
    console.show_hero(persona)?;
    let summary = console.run_wizard(persona, &wizard).await?;
    info!(
        submissions = summary.submissions,
        aborted = summary.aborted,
        "RSVP session ended"
    );
    Ok(())
}

fn draft_from_args(args: SubmitArgs) -> RsvpDraft {
    RsvpDraft {
        name: args.name.unwrap_or_default(),
        email: args.email.unwrap_or_default(),
        phone: args.phone.unwrap_or_default(),
        attendance: args.attendance,
        notifications: args.notifications,
        dietary_restrictions: args.diet.unwrap_or_default(),
        song_request: args.song.unwrap_or_default(),
        message_for_couple: args.message.unwrap_or_default(),
    }
}

/// One-shot RSVP from command-line flags
async fn run_submit(config: &AppConfig, args: SubmitArgs) -> Result<()> {
    let backend = create_backend(&config.backend, &config.data_dir())?;
    let wizard = RsvpWizard::new(backend);

    let report = console::submit_all(&wizard, draft_from_args(args)).await?;
    match report.outcome {
        StepOutcome::Submitted { record_id } => {
            if let Some(notification) = report.notification {
                println!("{}", notification);
            }
            if let Some(id) = record_id {
                println!("Reference: {}", id);
            }
            Ok(())
        }
        StepOutcome::Invalid { missing } => Err(Error::ValidationFailed {
            fields: missing.iter().map(|f| f.to_string()).collect(),
        }),
        // Returned rather than exiting here so the log guards flush.
        StepOutcome::SubmitFailed { message } => Err(Error::SubmissionFailed {
            message: report.notification.map(|n| n.description).unwrap_or(message),
        }),
        StepOutcome::Advanced => Err(Error::Internal(format!(
            "submission stopped at the {} step",
            report.step
        ))),
    }
}

// ─────────────────────────────────────────────────────────────────
// Details
// ─────────────────────────────────────────────────────────────────

/// Print the invitation for the saved (or given) character
fn show_details(config: &AppConfig, persona_override: Option<String>) -> Result<()> {
    let persona = match persona_override {
        Some(ref value) => parse_persona(value)?,
        None => persona_context(config)
            .get_selection()
            .ok_or(Error::PersonaNotSelected)?,
    };
    let registry = PersonaRegistry::new();
    let stdout = std::io::stdout();
    console::write_invitation(&mut stdout.lock(), &registry, persona)
}

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// Handle persona subcommands
fn handle_persona_command(subcommand: PersonaSubcommand, config: &AppConfig) -> Result<()> {
    let registry = PersonaRegistry::new();
    let context = persona_context(config);

    match subcommand {
        PersonaSubcommand::List => {
            let selected = context.get_selection();
            println!("Available characters:");
            for listing in registry.list_available() {
                let marker = if selected == Some(listing.persona) { "*" } else { " " };
                println!(
                    "{} {:<8} {}",
                    marker,
                    listing.persona.slug(),
                    listing.description
                );
            }
        }
        PersonaSubcommand::Show => match context.get_selection() {
            Some(persona) => {
                let theme = registry.theme(persona);
                let copy = registry.rsvp_copy(persona);
                println!("Selected character: {} ({})", persona.display_name(), persona.slug());
                println!("  {}", registry.description(persona));
                println!();
                println!("Theme:");
                println!("  Primary:   {}", theme.primary);
                println!("  Secondary: {}", theme.secondary);
                println!("  Accent:    {}", theme.accent);
                println!("  Dark:      {}", theme.dark);
                println!("  Gradient:  {}", theme.gradient);
                println!();
                println!("RSVP heading: {}", copy.title);
            }
            None => {
                println!("No character selected.");
                println!("Run 'wedding-rsvp persona select <wesley|heather|puffy>' to choose one.");
            }
        },
        PersonaSubcommand::Select { persona } => {
            let persona = parse_persona(&persona)?;
            context.select(persona)?;
            println!("Selected character: {}", persona.display_name());
        }
        PersonaSubcommand::Clear => {
            context.clear()?;
            println!("Character selection cleared.");
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand, config_path: Option<&str>) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = AppConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg.redacted())?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", written.display());
        }
        ConfigSubcommand::Validate => {
            AppConfig::load(config_path)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
