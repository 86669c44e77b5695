//! Interactive session handler
//!
//! Holds one [`WeekSession`] in memory and runs a readline loop over it.
//! Every request goes to the plan service; nothing is generated locally.

use crate::client::{render_day, render_received, render_week, PlanClient, ReceivedDay, WeekSession};
use crate::commands::session_commands::{parse_session_command, print_help, SessionCommand};
use crate::config::Config;
use crate::error::{FitplanError, Result};
use crate::locale::Locale;
use crate::request::AthleteProfile;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command
    Continue,
    /// Leave the session
    Exit,
}

/// Apply one parsed command to the session
///
/// Failures of individual commands are reported and do not end the
/// session; only transport-level setup errors propagate.
///
/// # Errors
///
/// Returns error if output cannot be serialized
pub async fn apply_command(
    client: &PlanClient,
    session: &mut WeekSession,
    locale: Locale,
    command: SessionCommand,
) -> Result<Flow> {
    match command {
        SessionCommand::Empty => {}
        SessionCommand::Help => print_help(),
        SessionCommand::Exit => return Ok(Flow::Exit),
        SessionCommand::Generate(goals) => {
            if let Some(goals) = goals {
                session.set_goals(goals);
            }
            let profile = session.profile().clone();
            println!("{}", "Generating the week...".dimmed());

            let mut position = 0;
            let result = client
                .generate_week(&profile, |day| {
                    position += 1;
                    println!("{}", render_received(day, position, locale));
                })
                .await;

            match result {
                Ok(days) => {
                    let invalid = days.iter().filter(|d| !d.is_valid()).count();
                    session.replace_week(days);
                    if invalid > 0 {
                        println!(
                            "{}",
                            format!("{} day(s) failed validation; use 'regen <day>'.", invalid)
                                .yellow()
                        );
                    }
                }
                Err(err) => report(&err),
            }
        }
        SessionCommand::Show(None) => {
            if session.is_empty() {
                println!("{}", "No week yet. Use 'generate'.".yellow());
            } else {
                println!("{}", render_week(session.days(), locale));
            }
        }
        SessionCommand::Show(Some(key)) => match session.find(&key) {
            Some(index) => println!("{}", render_received(&session.days()[index], index + 1, locale)),
            None => println!("{}", format!("No day '{}' in the week.", key).yellow()),
        },
        SessionCommand::Regenerate(key) => {
            let Some(index) = session.find(&key) else {
                println!("{}", format!("No day '{}' in the week.", key).yellow());
                return Ok(Flow::Continue);
            };
            let label = session
                .label_at(index)
                .map(str::to_string)
                .or_else(|| locale.week_days().get(index).map(|d| d.to_string()))
                .unwrap_or(key);
            println!("{}", format!("Regenerating {}...", label).dimmed());

            match client.generate_day(session.profile(), &label).await {
                Ok(plan) => {
                    println!("{}", render_day(&plan, locale));
                    session.replace_week(replace_at(session.days(), index, plan));
                }
                Err(err) => report(&err),
            }
        }
        SessionCommand::Edit { day, instructions } => {
            let plan = match session.plan_for(&day) {
                Ok(plan) => plan.clone(),
                Err(err) => {
                    report(&err);
                    return Ok(Flow::Continue);
                }
            };
            println!("{}", format!("Editing {}...", plan.day).dimmed());

            match client.edit_day(session.profile(), &plan, &instructions).await {
                Ok(edited) => {
                    println!("{}", render_day(&edited, locale));
                    session.replace_day(&day, edited)?;
                }
                Err(err) => report(&err),
            }
        }
    }
    Ok(Flow::Continue)
}

fn replace_at(
    days: &[ReceivedDay],
    index: usize,
    plan: crate::plan::DayPlan,
) -> Vec<ReceivedDay> {
    let mut days = days.to_vec();
    if let Some(slot) = days.get_mut(index) {
        *slot = ReceivedDay::Valid(plan);
    }
    days
}

fn report(err: &anyhow::Error) {
    let message = match err.downcast_ref::<FitplanError>() {
        Some(FitplanError::IncompleteWeek { received, expected }) => format!(
            "The week is incomplete ({} of {} days); it has been discarded.",
            received, expected
        ),
        Some(FitplanError::InvalidResponse { issues }) => {
            format!("The plan failed validation: {}", issues)
        }
        Some(other) => other.to_string(),
        None => format!("{:#}", err),
    };
    println!("{}", message.red());
}

/// Run the interactive session
///
/// # Errors
///
/// Returns error if the HTTP client or the line editor cannot be created
pub async fn run_session(config: Config, profile: AthleteProfile) -> Result<()> {
    let client = PlanClient::new(&config.client)?;
    let locale = config.generation.locale;
    let mut session = WeekSession::new(profile);
    let mut rl = DefaultEditor::new()?;

    tracing::info!("Starting session against {}", client.base_url());
    println!("\n{}", "fitplan session".bold());
    println!("Service: {}", client.base_url().cyan());
    println!("Type 'help' for commands, 'exit' to quit\n");

    loop {
        match rl.readline("fitplan> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    rl.add_history_entry(trimmed)?;
                }
                let command = match parse_session_command(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e.to_string().yellow());
                        continue;
                    }
                };
                if apply_command(&client, &mut session, locale, command).await? == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}
