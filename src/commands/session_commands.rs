//! Command parser for the interactive session
//!
//! Session input is always a command; there is no free-text mode. A leading
//! `/` is accepted and ignored, and command words are case-insensitive.

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing session commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType 'help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands available in the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Generate a whole week, optionally replacing the goals first
    Generate(Option<String>),

    /// Show the whole week or one day
    Show(Option<String>),

    /// Generate one day again, replacing it in the week
    Regenerate(String),

    /// Rework one day following free-text instructions
    Edit { day: String, instructions: String },

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Blank input
    Empty,
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn non_empty(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Parse one line of session input
///
/// # Errors
///
/// Returns [`CommandError::UnknownCommand`] for an unknown command word and
/// [`CommandError::MissingArgument`] when `regen` or `edit` lack arguments.
///
/// # Examples
///
/// ```
/// use fitplan::commands::session_commands::{parse_session_command, SessionCommand};
///
/// assert_eq!(
///     parse_session_command("edit Lunes más cardio").unwrap(),
///     SessionCommand::Edit { day: "Lunes".into(), instructions: "más cardio".into() }
/// );
/// assert_eq!(parse_session_command("/regen martes").unwrap(), SessionCommand::Regenerate("martes".into()));
/// assert!(parse_session_command("dance").is_err());
/// ```
pub fn parse_session_command(input: &str) -> Result<SessionCommand, CommandError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(SessionCommand::Empty);
    }

    let (word, rest) = split_word(trimmed);
    match word.to_lowercase().as_str() {
        "generate" | "gen" | "week" => Ok(SessionCommand::Generate(non_empty(rest))),
        "show" | "ls" => Ok(SessionCommand::Show(non_empty(rest))),
        "regen" | "regenerate" => match non_empty(rest) {
            Some(day) => Ok(SessionCommand::Regenerate(day)),
            None => Err(CommandError::MissingArgument {
                command: "regen".to_string(),
                usage: "regen <day>".to_string(),
            }),
        },
        "edit" => {
            let (day, instructions) = split_word(rest);
            if day.is_empty() || instructions.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "edit".to_string(),
                    usage: "edit <day> <instructions>".to_string(),
                });
            }
            Ok(SessionCommand::Edit {
                day: day.to_string(),
                instructions: instructions.to_string(),
            })
        }
        "help" | "h" | "?" => Ok(SessionCommand::Help),
        "exit" | "quit" | "q" => Ok(SessionCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Print session help
pub fn print_help() {
    println!("\n{}", "Session commands".bold());
    println!("  {}  generate the whole week", "generate [goals]".cyan());
    println!("  {}       show the week, or one day", "show [day]".cyan());
    println!("  {}        generate one day again", "regen <day>".cyan());
    println!(
        "  {}  rework one day, e.g. edit Lunes add 10 minutes of cardio",
        "edit <day> <instructions>".cyan()
    );
    println!("  {}              this help", "help".cyan());
    println!("  {}              leave the session", "exit".cyan());
    println!("\nDays can be named or numbered 1-7.\n");
}
