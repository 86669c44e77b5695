//! Plan generation service
//!
//! Dispatches a validated [`PlanRequest`] to single-day, edit or whole-week
//! generation. Transport concerns (status codes, body framing) live in the
//! server module; this layer only produces plans or errors.

use crate::config::{Config, GenerationConfig, WeekDelivery};
use crate::error::Result;
use crate::generator::{generate_week, week_stream, DayGenerator};
use crate::locale::Locale;
use crate::plan::DayPlan;
use crate::prompts::{build_day_prompt, DayPromptInput, EditDirective};
use crate::providers::{create_provider, Provider};
use crate::request::PlanRequest;
use futures::stream::BoxStream;
use std::fmt;
use std::sync::Arc;

/// Result of handling one request
pub enum PlanOutcome {
    /// Single-day generate or edit
    Day(DayPlan),
    /// Whole week, all seven days validated
    Week(Vec<DayPlan>),
    /// Whole week, delivered day by day
    WeekStream(BoxStream<'static, Result<DayPlan>>),
}

impl fmt::Debug for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(plan) => f.debug_tuple("Day").field(plan).finish(),
            Self::Week(days) => f.debug_tuple("Week").field(days).finish(),
            Self::WeekStream(_) => f.write_str("WeekStream(..)"),
        }
    }
}

/// Stateless request handler shared by all connections
pub struct PlanService {
    generator: DayGenerator,
    locale: Locale,
    delivery: WeekDelivery,
    provider_type: String,
}

impl PlanService {
    /// Create a service around an existing provider
    pub fn new(
        provider: Arc<dyn Provider>,
        provider_type: impl Into<String>,
        generation: &GenerationConfig,
        delivery: WeekDelivery,
    ) -> Self {
        Self {
            generator: DayGenerator::new(provider, generation.max_attempts),
            locale: generation.locale,
            delivery,
            provider_type: provider_type.into(),
        }
    }

    /// Build the provider from configuration and wrap it
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot be created (unknown type,
    /// missing credentials, HTTP client failure).
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider: Arc<dyn Provider> = Arc::from(create_provider(&config.provider)?);
        Ok(Self::new(
            provider,
            config.provider.provider_type.clone(),
            &config.generation,
            config.server.week_delivery,
        ))
    }

    /// Language of prompts and weekday labels
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Configured week delivery mode
    pub fn delivery(&self) -> WeekDelivery {
        self.delivery
    }

    /// Configured provider type
    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    /// Active model, when the provider reports one
    pub fn model(&self) -> Option<String> {
        self.generator.provider().get_current_model().ok()
    }

    /// Handle one validated request
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FitplanError::GenerationExhausted`] when a day
    /// cannot be generated. For [`PlanOutcome::WeekStream`] failures arrive
    /// inside the stream instead.
    pub async fn handle(&self, request: PlanRequest) -> Result<PlanOutcome> {
        match request {
            PlanRequest::GenerateDay { profile, day } => {
                tracing::info!(day = %day, "Generating single day");
                let prompt = build_day_prompt(
                    self.locale,
                    &DayPromptInput {
                        day: &day,
                        profile: &profile,
                        context: "",
                        edit: None,
                    },
                );
                let plan = self.generator.generate_day(&day, &prompt).await?;
                Ok(PlanOutcome::Day(plan))
            }
            PlanRequest::Edit {
                profile,
                day,
                existing_plan,
                instructions,
            } => {
                tracing::info!(day = %day, "Editing day");
                let prompt = build_day_prompt(
                    self.locale,
                    &DayPromptInput {
                        day: &day,
                        profile: &profile,
                        context: "",
                        edit: Some(EditDirective {
                            existing_plan: &existing_plan,
                            instructions: &instructions,
                        }),
                    },
                );
                // The edited plan keeps the identity of the plan it replaces
                let plan = self
                    .generator
                    .generate_day(&existing_plan.day, &prompt)
                    .await?;
                Ok(PlanOutcome::Day(plan))
            }
            PlanRequest::GenerateWeek { profile } => {
                tracing::info!(delivery = ?self.delivery, "Generating week");
                match self.delivery {
                    WeekDelivery::Batch => Ok(PlanOutcome::Week(
                        generate_week(self.generator.clone(), self.locale, profile).await?,
                    )),
                    WeekDelivery::Stream => Ok(PlanOutcome::WeekStream(week_stream(
                        self.generator.clone(),
                        self.locale,
                        profile,
                    ))),
                }
            }
        }
    }

    /// Parse a raw request body and handle it
    ///
    /// # Errors
    ///
    /// Request validation errors from [`PlanRequest::from_value`], then
    /// anything [`PlanService::handle`] returns.
    pub async fn handle_value(&self, body: &serde_json::Value) -> Result<PlanOutcome> {
        let request = PlanRequest::from_value(body)?;
        self.handle(request).await
    }
}
