//! Terminal presentation: the persona picker and the RSVP steps.
//!
//! Generic over the input and output streams so whole sessions can be
//! scripted in tests.

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::Result;
use crate::persona::{Persona, PersonaContext, PersonaRegistry, EVENT};
use crate::types::Attendance;
use crate::wizard::{Notification, RsvpDraft, RsvpWizard, StepOutcome, StepReport, WizardStep};

/// Typed at any optional step to go back one step
pub const BACK_COMMAND: &str = ":back";

/// Typed at a prompt to blank out a previously entered value
pub const CLEAR_COMMAND: &str = "-";

/// How an interactive session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Responses stored during the session
    pub submissions: u32,
    /// Input ended before the guest finished
    pub aborted: bool,
}

/// Answer to a text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    /// Keep the current value
    Keep,
    Clear,
    Back,
    Value(String),
}

pub struct Console<'a, R, W> {
    input: R,
    output: W,
    registry: &'a PersonaRegistry,
    title: &'a str,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(input: R, output: W, registry: &'a PersonaRegistry, title: &'a str) -> Self {
        Self {
            input,
            output,
            registry,
            title,
        }
    }

    /// Landing banner for the session.
    pub fn show_hero(&mut self, persona: Persona) -> Result<()> {
        let hero = self.registry.hero(persona);
        debug!(background = %self.registry.hero_background(persona), "Rendering banner");
        writeln!(self.output, "*** {} ***", hero.title)?;
        writeln!(self.output, "{}", hero.subtitle)?;
        writeln!(self.output, "{} | {}", EVENT.dates, EVENT.location)?;
        writeln!(self.output, "{}", hero.call_to_action)?;
        Ok(())
    }

    /// Show the picker until the guest chooses, and save the choice.
    ///
    /// Returns `None` if input ends first.
    pub fn pick_persona(&mut self, context: &PersonaContext) -> Result<Option<Persona>> {
        writeln!(self.output, "{}", self.title)?;
        writeln!(self.output, "Who would you like to hear the invitation from?")?;
        for (index, listing) in self.registry.list_available().iter().enumerate() {
            writeln!(
                self.output,
                "  {}. {} - {}",
                index + 1,
                listing.persona.display_name(),
                listing.description
            )?;
        }

        let persona = loop {
            let Some(line) = self.read_line("Choose 1-3 or a name: ")? else {
                return Ok(None);
            };
            match parse_persona_choice(&line) {
                Some(persona) => break persona,
                None => writeln!(self.output, "Please choose 1, 2 or 3.")?,
            }
        };

        if let Err(e) = context.select(persona) {
            warn!(error = %e.format_for_log(), "Could not save character choice");
            writeln!(self.output, "(Your choice will not be remembered next time.)")?;
        }
        Ok(Some(persona))
    }

    /// Drive the wizard until the guest stops or input ends.
    pub async fn run_wizard(&mut self, persona: Persona, wizard: &RsvpWizard) -> Result<SessionSummary> {
        let mut summary = SessionSummary {
            submissions: 0,
            aborted: false,
        };

        loop {
            let step = wizard.step();
            self.render_step(persona, step)?;

            let report = match step {
                WizardStep::Initial => {
                    if !self.collect_details(persona, wizard)? {
                        summary.aborted = true;
                        return Ok(summary);
                    }
                    wizard.submit_details().await?
                }
                WizardStep::Diet | WizardStep::Song | WizardStep::Message => {
                    let current = optional_field(&wizard.draft(), step).to_string();
                    let hint = format!("blank keeps it, {} clears it, {} goes back", CLEAR_COMMAND, BACK_COMMAND);
                    let Some(answer) = self.ask(&format!("{} ({})", field_label(step), hint), &current, true)? else {
                        summary.aborted = true;
                        return Ok(summary);
                    };
                    match answer {
                        Answer::Back => wizard.back()?,
                        answer => {
                            apply_answer(wizard, step, answer)?;
                            if step == WizardStep::Message {
                                writeln!(self.output, "Sending your RSVP...")?;
                                wizard.submit().await?
                            } else {
                                wizard.next()?
                            }
                        }
                    }
                }
                WizardStep::Complete => {
                    let Some(line) = self.read_line("Submit another response? (y/N): ")? else {
                        return Ok(summary);
                    };
                    if is_yes(&line) {
                        wizard.start_over()?
                    } else {
                        return Ok(summary);
                    }
                }
            };

            if matches!(report.outcome, StepOutcome::Submitted { .. }) {
                summary.submissions += 1;
            }
            self.show_report(&report)?;
        }
    }

    /// Ask for the first-step fields. `false` means input ended.
    fn collect_details(&mut self, persona: Persona, wizard: &RsvpWizard) -> Result<bool> {
        let draft = wizard.draft();

        let Some(name) = self.ask("Your name", &draft.name, false)? else {
            return Ok(false);
        };
        let Some(email) = self.ask("Email", &draft.email, false)? else {
            return Ok(false);
        };
        let Some(phone) = self.ask("Phone (optional)", &draft.phone, false)? else {
            return Ok(false);
        };

        let current = draft.attendance.map(|a| a.as_str()).unwrap_or_default();
        let attendance = loop {
            let Some(line) = self.read_line(&prompt_with_current("Will you attend? (yes/no)", current))? else {
                return Ok(false);
            };
            if line.trim().is_empty() {
                break draft.attendance;
            }
            match Attendance::from_str(&line) {
                Ok(a) => {
                    writeln!(self.output, "  {}", a.label())?;
                    break Some(a);
                }
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        };

        let current = if draft.notifications { "y" } else { "n" };
        let Some(line) = self.read_line(&prompt_with_current("Send me updates about the wedding? (y/n)", current))? else {
            return Ok(false);
        };
        let notifications = if line.trim().is_empty() {
            draft.notifications
        } else {
            is_yes(&line)
        };

        wizard.update_draft(|d| {
            set_text(&mut d.name, name);
            set_text(&mut d.email, email);
            set_text(&mut d.phone, phone);
            d.attendance = attendance;
            d.notifications = notifications;
        })?;
        writeln!(self.output, "[{}]", self.registry.rsvp_copy(persona).submit_text)?;
        Ok(true)
    }

    fn render_step(&mut self, persona: Persona, step: WizardStep) -> Result<()> {
        let copy = self.registry.step_copy(persona, step);
        if let Some(ref background) = copy.background {
            debug!(step = %step, background = %background, "Rendering step");
        }
        writeln!(self.output)?;
        writeln!(self.output, "== {} ==", copy.title)?;
        writeln!(self.output, "{}", copy.description)?;
        Ok(())
    }

    fn show_report(&mut self, report: &StepReport) -> Result<()> {
        if let Some(ref notification) = report.notification {
            self.show_notification(notification)?;
        }
        Ok(())
    }

    fn show_notification(&mut self, notification: &Notification) -> Result<()> {
        let marker = if notification.is_destructive() { "!" } else { "*" };
        writeln!(self.output, "{} {}", marker, notification)?;
        Ok(())
    }

    fn ask(&mut self, label: &str, current: &str, allow_back: bool) -> Result<Option<Answer>> {
        let Some(line) = self.read_line(&prompt_with_current(label, current))? else {
            return Ok(None);
        };
        let trimmed = line.trim();
        let answer = if allow_back && trimmed == BACK_COMMAND {
            Answer::Back
        } else if trimmed == CLEAR_COMMAND {
            Answer::Clear
        } else if trimmed.is_empty() {
            Answer::Keep
        } else {
            Answer::Value(trimmed.to_string())
        };
        Ok(Some(answer))
    }

    /// One line of input without the trailing newline; `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Run a complete draft through every step without prompting.
///
/// Declining guests are stored from the first step; everyone else walks
/// through the optional steps to the final submit. Returns the report of the
/// last action taken.
pub async fn submit_all(wizard: &RsvpWizard, draft: RsvpDraft) -> Result<StepReport> {
    wizard.update_draft(|d| *d = draft)?;

    let mut report = wizard.submit_details().await?;
    while report.outcome == StepOutcome::Advanced {
        report = match report.step {
            WizardStep::Diet | WizardStep::Song => wizard.next()?,
            WizardStep::Message => wizard.submit().await?,
            WizardStep::Initial | WizardStep::Complete => break,
        };
    }
    Ok(report)
}

fn prompt_with_current(label: &str, current: &str) -> String {
    if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, current)
    }
}

/// Picker input: a 1-based position or a character name
fn parse_persona_choice(input: &str) -> Option<Persona> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| Persona::all().get(i).copied());
    }
    Persona::from_str(input).ok()
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

fn set_text(field: &mut String, answer: Answer) {
    match answer {
        Answer::Value(v) => *field = v,
        Answer::Clear => field.clear(),
        Answer::Keep | Answer::Back => {}
    }
}

fn field_label(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Diet => "Dietary restrictions",
        WizardStep::Song => "Song request",
        WizardStep::Message => "Message for the couple",
        WizardStep::Initial | WizardStep::Complete => "",
    }
}

fn optional_field(draft: &RsvpDraft, step: WizardStep) -> &str {
    match step {
        WizardStep::Diet => &draft.dietary_restrictions,
        WizardStep::Song => &draft.song_request,
        WizardStep::Message => &draft.message_for_couple,
        WizardStep::Initial | WizardStep::Complete => "",
    }
}

fn apply_answer(wizard: &RsvpWizard, step: WizardStep, answer: Answer) -> Result<()> {
    if answer == Answer::Keep {
        return Ok(());
    }
    wizard.update_draft(|d| {
        let field = match step {
            WizardStep::Diet => &mut d.dietary_restrictions,
            WizardStep::Song => &mut d.song_request,
            WizardStep::Message => &mut d.message_for_couple,
            WizardStep::Initial | WizardStep::Complete => return,
        };
        set_text(field, answer);
    })
}

/// Full invitation page: banner, ceremony, reception and the weekend.
pub fn write_invitation<W: Write>(output: &mut W, registry: &PersonaRegistry, persona: Persona) -> Result<()> {
    let hero = registry.hero(persona);
    let details = registry.details(persona);

    writeln!(output, "{}", hero.title)?;
    writeln!(output, "{}", hero.subtitle)?;
    writeln!(output, "{}", hero.description)?;
    writeln!(output, "{} | {}", EVENT.dates, EVENT.location)?;
    writeln!(output)?;
    writeln!(output, "== {} ==", details.section_title)?;
    writeln!(output)?;
    writeln!(output, "{}", details.ceremony_title)?;
    writeln!(output, "  {}", details.ceremony_description)?;
    writeln!(output, "  When:  {}", EVENT.ceremony_time)?;
    writeln!(output, "  Where: {}", EVENT.venue)?;
    writeln!(output)?;
    writeln!(output, "{}", details.reception_title)?;
    writeln!(output, "  {}", details.reception_description)?;
    writeln!(output, "  When:  {}", EVENT.reception_time)?;
    writeln!(output, "  Where: {}", EVENT.venue)?;
    writeln!(output)?;
    writeln!(output, "{}", details.schedule_title)?;
    for day in EVENT.schedule {
        let marker = if day.highlight { "*" } else { "-" };
        writeln!(output, "  {} {}: {}, {}", marker, day.date, day.headline, day.detail)?;
    }
    Ok(())
}
