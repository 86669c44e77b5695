//! Fitplan - weekly workout plan generator
//!
#![doc = "Main entry point for the fitplan application."]

use anyhow::Result;

use fitplan::cli::{Cli, Commands, ProfileArgs};
use fitplan::commands;
use fitplan::config::Config;
use fitplan::logging;
use fitplan::request::AthleteProfile;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Initialize tracing once the log settings are known
    logging::init_logging(&config.logging)?;

    // Execute command
    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting plan service");
            commands::serve::run_serve(config).await
        }
        Commands::Week { profile, json, .. } => {
            tracing::debug!("Requesting a week");
            commands::generate::run_week(&config, to_profile(profile), json).await
        }
        Commands::Day {
            day, profile, json, ..
        } => {
            tracing::debug!("Requesting day {}", day);
            commands::generate::run_day(&config, to_profile(profile), &day, json).await
        }
        Commands::Session { profile, .. } => {
            tracing::info!("Starting interactive session");
            commands::session::run_session(config, to_profile(profile)).await
        }
    }
}

fn to_profile(args: ProfileArgs) -> AthleteProfile {
    AthleteProfile::new(args.goals, args.level, args.equipment)
}
