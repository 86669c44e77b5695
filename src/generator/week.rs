//! Whole-week generation
//!
//! The week is a fold over the locale's weekdays: each step builds the
//! day's prompt from the context accumulated so far, generates the day,
//! and appends the result to the context handed to the next step. The
//! fold is exposed as a stream so the same generator serves both the
//! all-or-nothing batch response and the incrementally flushed one.

use super::DayGenerator;
use crate::error::Result;
use crate::locale::Locale;
use crate::plan::DayPlan;
use crate::prompts::{build_day_prompt, DayPromptInput};
use crate::request::AthleteProfile;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

/// Serialized plans of the days generated so far in one week
///
/// Strictly causal: day N's prompt sees days 1..N-1 only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekContext {
    text: String,
    days: usize,
}

impl WeekContext {
    /// Empty context for the first day
    pub fn new() -> Self {
        Self::default()
    }

    /// Text embedded in the next prompt
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of days folded in
    pub fn len(&self) -> usize {
        self.days
    }

    /// True before the first day
    pub fn is_empty(&self) -> bool {
        self.days == 0
    }

    /// Context extended with `plan`
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::generator::WeekContext;
    /// use fitplan::locale::Locale;
    /// use fitplan::plan::DayPlan;
    /// use serde_json::json;
    ///
    /// let plan = DayPlan::from_value(&json!({
    ///     "day": "Lunes",
    ///     "warmup": "trote",
    ///     "workout": { "type": "cardio", "durationMinutes": 30,
    ///                  "exercises": [{ "name": "Correr", "sets": 1, "timePerSetMinutes": 30 }] },
    ///     "cooldown": "estirar"
    /// }))
    /// .unwrap();
    /// let context = WeekContext::new().append(Locale::Es, &plan);
    /// assert!(context.as_str().starts_with("\nDía Lunes: {"));
    /// assert_eq!(context.len(), 1);
    /// ```
    pub fn append(mut self, locale: Locale, plan: &DayPlan) -> Self {
        let label = match locale {
            Locale::Es => "Día",
            Locale::En => "Day",
        };
        self.text
            .push_str(&format!("\n{} {}: {}", label, plan.day, plan.to_pretty_json()));
        self.days += 1;
        self
    }
}

struct WeekFold {
    generator: DayGenerator,
    locale: Locale,
    profile: AthleteProfile,
    context: WeekContext,
    next: usize,
}

/// Stream of the seven days in weekday order
///
/// Yields each day as soon as it validates, and returns to the executor
/// before requesting the following day. After the first error the
/// stream yields that error and ends; later days are never requested.
pub fn week_stream(
    generator: DayGenerator,
    locale: Locale,
    profile: AthleteProfile,
) -> BoxStream<'static, Result<DayPlan>> {
    let start = WeekFold {
        generator,
        locale,
        profile,
        context: WeekContext::new(),
        next: 0,
    };

    stream::unfold(Some(start), |fold| async move {
        let mut fold = fold?;
        if fold.next > 0 {
            // Hand the finished day to the consumer before starting the next
            tokio::task::yield_now().await;
        }
        let day = *fold.locale.week_days().get(fold.next)?;

        let prompt = build_day_prompt(
            fold.locale,
            &DayPromptInput {
                day,
                profile: &fold.profile,
                context: fold.context.as_str(),
                edit: None,
            },
        );

        match fold.generator.generate_day(day, &prompt).await {
            Ok(plan) => {
                tracing::info!(day, index = fold.next + 1, "Day generated");
                fold.context = fold.context.append(fold.locale, &plan);
                fold.next += 1;
                Some((Ok(plan), Some(fold)))
            }
            Err(err) => {
                tracing::error!(day, index = fold.next + 1, "Week generation stopped: {}", err);
                Some((Err(err), None))
            }
        }
    })
    .boxed()
}

/// Generate the full week, all or nothing
///
/// # Errors
///
/// Returns the first day's failure; days generated before it are dropped.
pub async fn generate_week(
    generator: DayGenerator,
    locale: Locale,
    profile: AthleteProfile,
) -> Result<Vec<DayPlan>> {
    week_stream(generator, locale, profile).try_collect().await
}
