//! Bounded per-day retry loop
//!
//! Each day owns its own [`AttemptState`]; nothing carries over between
//! days. Every attempt sends the identical request, and there is no delay
//! between attempts. Backend, parse and schema failures are all retried.

use crate::error::{FitplanError, Result};
use crate::plan::{day_plan_json_schema, DayPlan};
use crate::providers::{GenerationRequest, Provider};
use std::fmt;
use std::sync::Arc;

/// Name under which the day plan schema is declared to backends
pub const DAY_PLAN_SCHEMA_NAME: &str = "day_plan";

/// Why a single attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transport failure or error status from the backend
    Backend,
    /// Backend text was not JSON
    Parse,
    /// JSON did not have the day plan shape
    Schema,
}

impl ErrorClass {
    /// Classify a provider error
    pub fn of(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FitplanError>() {
            Some(FitplanError::MalformedOutput(_)) => Self::Parse,
            Some(FitplanError::InvalidResponse { .. }) => Self::Schema,
            _ => Self::Backend,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend => write!(f, "backend"),
            Self::Parse => write!(f, "parse"),
            Self::Schema => write!(f, "schema"),
        }
    }
}

/// Position of one day in its retry loop
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState {
    /// About to make attempt `n` (1-based)
    Attempting(u32),
    /// An attempt produced a valid plan
    Succeeded(DayPlan),
    /// `attempts` attempts failed; no further calls are made
    Exhausted {
        /// Attempts made
        attempts: u32,
    },
}

impl AttemptState {
    /// Transition after the current attempt finished
    ///
    /// Only `Attempting` advances; terminal states are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::generator::{AttemptState, ErrorClass};
    ///
    /// let next = AttemptState::Attempting(1).advance(Err(ErrorClass::Schema), 3);
    /// assert_eq!(next, AttemptState::Attempting(2));
    ///
    /// let done = AttemptState::Attempting(3).advance(Err(ErrorClass::Backend), 3);
    /// assert_eq!(done, AttemptState::Exhausted { attempts: 3 });
    /// ```
    pub fn advance(self, outcome: std::result::Result<DayPlan, ErrorClass>, max_attempts: u32) -> Self {
        match self {
            Self::Attempting(n) => match outcome {
                Ok(plan) => Self::Succeeded(plan),
                Err(_) if n >= max_attempts => Self::Exhausted { attempts: n },
                Err(_) => Self::Attempting(n + 1),
            },
            terminal => terminal,
        }
    }
}

/// Generates one validated day plan with bounded retries
#[derive(Clone)]
pub struct DayGenerator {
    provider: Arc<dyn Provider>,
    max_attempts: u32,
}

impl DayGenerator {
    /// Create a generator; `max_attempts` below one is treated as one
    pub fn new(provider: Arc<dyn Provider>, max_attempts: u32) -> Self {
        Self {
            provider,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Attempts allowed per day
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backend this generator calls
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Generate the plan for `day` from `prompt`
    ///
    /// The returned plan's `day` is set to `day` regardless of what the
    /// backend echoed.
    ///
    /// # Errors
    ///
    /// Returns [`FitplanError::GenerationExhausted`] naming `day` once every
    /// attempt has failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_trait::async_trait;
    /// use fitplan::error::{FitplanError, Result};
    /// use fitplan::generator::DayGenerator;
    /// use fitplan::providers::{Generation, GenerationRequest, Provider};
    /// use std::sync::Arc;
    ///
    /// struct Offline;
    ///
    /// #[async_trait]
    /// impl Provider for Offline {
    ///     async fn generate(&self, _request: &GenerationRequest) -> Result<Generation> {
    ///         Err(FitplanError::Provider("offline".to_string()).into())
    ///     }
    /// }
    ///
    /// # tokio_test::block_on(async {
    /// let generator = DayGenerator::new(Arc::new(Offline), 2);
    /// let err = generator.generate_day("Lunes", "prompt").await.unwrap_err();
    /// assert!(err.to_string().contains("Lunes"));
    /// # });
    /// ```
    pub async fn generate_day(&self, day: &str, prompt: &str) -> Result<DayPlan> {
        let request = GenerationRequest::new(prompt, DAY_PLAN_SCHEMA_NAME, day_plan_json_schema());
        let mut state = AttemptState::Attempting(1);

        loop {
            state = match state {
                AttemptState::Attempting(attempt) => {
                    let outcome = self.attempt(day, attempt, &request).await;
                    AttemptState::Attempting(attempt).advance(outcome, self.max_attempts)
                }
                AttemptState::Succeeded(plan) => return Ok(plan.with_day(day)),
                AttemptState::Exhausted { attempts } => {
                    tracing::error!(day, attempts, "Giving up on day");
                    return Err(FitplanError::GenerationExhausted {
                        day: day.to_string(),
                        attempts,
                    }
                    .into());
                }
            };
        }
    }

    async fn attempt(
        &self,
        day: &str,
        attempt: u32,
        request: &GenerationRequest,
    ) -> std::result::Result<DayPlan, ErrorClass> {
        tracing::debug!(day, attempt, "Requesting day plan");

        let result = match self.provider.generate(request).await {
            Ok(generation) => {
                if let Some(usage) = generation.usage {
                    tracing::debug!(
                        day,
                        attempt,
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "Backend usage"
                    );
                }
                DayPlan::from_value(&generation.value)
                    .map_err(|issues| anyhow::Error::from(FitplanError::InvalidResponse { issues }))
            }
            Err(err) => Err(err),
        };

        result.map_err(|err| {
            let error_class = ErrorClass::of(&err);
            tracing::warn!(
                day,
                attempt,
                max_attempts = self.max_attempts,
                error_class = %error_class,
                error = %err,
                "Day plan attempt failed"
            );
            error_class
        })
    }
}
