//! Command-line interface definition for Fitplan
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for running the plan service and for the
//! terminal client that talks to it.

use clap::{Parser, Subcommand};

/// Fitplan - AI-generated weekly workout plans
///
/// Runs the plan generation service, or requests and edits plans
/// from a running service.
#[derive(Parser, Debug, Clone)]
#[command(name = "fitplan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Athlete profile flags shared by client commands
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ProfileArgs {
    /// Training goals, free text
    #[arg(short, long)]
    pub goals: String,

    /// Fitness level, free text (e.g. "principiante")
    #[arg(short, long)]
    pub level: String,

    /// Available equipment, free text
    #[arg(short, long)]
    pub equipment: Option<String>,
}

/// Available commands for Fitplan
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the plan generation HTTP service
    Serve {
        /// Override the backend provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,

        /// Deliver weeks as NDJSON streams instead of one JSON array
        #[arg(long)]
        stream: bool,
    },

    /// Request a full week from the service and print it
    Week {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Base URL of the plan service
        #[arg(long)]
        server: Option<String>,

        /// Print raw JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// Request a single day from the service and print it
    Day {
        /// Day label (e.g. "Lunes")
        #[arg(short, long)]
        day: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Base URL of the plan service
        #[arg(long)]
        server: Option<String>,

        /// Print raw JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: generate a week, then regenerate or edit days
    Session {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Base URL of the plan service
        #[arg(long)]
        server: Option<String>,
    },
}

impl Commands {
    /// Service base URL override carried by client commands
    pub fn server_override(&self) -> Option<&str> {
        match self {
            Commands::Week { server, .. }
            | Commands::Day { server, .. }
            | Commands::Session { server, .. } => server.as_deref(),
            Commands::Serve { .. } => None,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Serve {
                provider: None,
                host: None,
                port: None,
                stream: false,
            },
        }
    }
}
