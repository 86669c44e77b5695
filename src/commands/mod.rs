/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `serve`: Run the plan generation HTTP service
- `generate`: One-shot client requests (`week`, `day`)
- `session`: Interactive client session over an in-memory week
*/

// Session input parser and help text
pub mod session_commands;

// Interactive session handler
pub mod session;

// Service command handler
pub mod serve {
    //! Plan service startup.
    //!
    //! Checks backend credentials, builds the provider and service, then
    //! serves until interrupted.

    use crate::config::Config;
    use crate::error::Result;
    use crate::server;
    use crate::service::PlanService;
    use std::sync::Arc;

    /// Start the plan generation service
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FitplanError::MissingCredentials`] before
    /// binding when the backend credential is absent, or any bind/serve
    /// error.
    pub async fn run_serve(config: Config) -> Result<()> {
        config.validate_credentials()?;

        let service = PlanService::from_config(&config)?;
        tracing::info!(
            provider = %service.provider_type(),
            model = service.model().as_deref().unwrap_or("unknown"),
            locale = %service.locale(),
            delivery = ?service.delivery(),
            max_attempts = config.generation.max_attempts,
            "Plan service configured"
        );

        server::run_serve(Arc::new(service), &config.server.bind_address()).await
    }
}

// One-shot client command handlers
pub mod generate {
    //! `week` and `day` commands.
    //!
    //! Request plans from a running service and print them as cards, or as
    //! JSON with `--json`.

    use crate::client::{render_day, render_received, PlanClient, ReceivedDay};
    use crate::config::Config;
    use crate::error::{FitplanError, Result};
    use crate::plan::DayPlan;
    use crate::request::AthleteProfile;
    use colored::Colorize;

    /// Request and print a whole week
    ///
    /// Cards are printed as days arrive. With `json`, a JSON array of the
    /// valid days is printed once the week is complete.
    ///
    /// # Errors
    ///
    /// Returns error if the service fails or the week is incomplete
    pub async fn run_week(config: &Config, profile: AthleteProfile, json: bool) -> Result<()> {
        let client = PlanClient::new(&config.client)?;
        let locale = config.generation.locale;
        tracing::info!("Requesting week from {}", client.base_url());

        let mut position = 0;
        let result = client
            .generate_week(&profile, |day| {
                position += 1;
                if !json {
                    println!("{}", render_received(day, position, locale));
                }
            })
            .await;

        let days = match result {
            Ok(days) => days,
            Err(err) => {
                if let Some(FitplanError::IncompleteWeek { received, expected }) =
                    err.downcast_ref::<FitplanError>()
                {
                    eprintln!(
                        "{}",
                        format!(
                            "The week is incomplete ({} of {} days); it has been discarded.",
                            received, expected
                        )
                        .red()
                    );
                }
                return Err(err);
            }
        };

        let invalid = days.iter().filter(|d| !d.is_valid()).count();
        if json {
            let plans: Vec<&DayPlan> = days.iter().filter_map(ReceivedDay::plan).collect();
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
        if invalid > 0 {
            eprintln!(
                "{}",
                format!("{} day(s) failed validation and were flagged.", invalid).yellow()
            );
        }
        Ok(())
    }

    /// Request and print a single day
    ///
    /// # Errors
    ///
    /// Returns error if the service fails or the plan fails re-validation
    pub async fn run_day(
        config: &Config,
        profile: AthleteProfile,
        day: &str,
        json: bool,
    ) -> Result<()> {
        let client = PlanClient::new(&config.client)?;
        tracing::info!(day, "Requesting day from {}", client.base_url());

        let plan = client.generate_day(&profile, day).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", render_day(&plan, config.generation.locale));
        }
        Ok(())
    }
}
