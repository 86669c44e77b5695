//! Day plan data model
//!
//! A [`DayPlan`] is the unit of output of the whole system. Instances are
//! only ever built by [`validate_day_plan`], so holding a `DayPlan` means the
//! underlying JSON conformed to the shape described by
//! [`day_plan_json_schema`].

pub mod issues;
pub mod schema;
pub mod validate;

pub use issues::{SchemaIssue, SchemaIssues};
pub use schema::day_plan_json_schema;
pub use validate::validate_day_plan;

use serde::Serialize;

/// Structured workout description for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// Day label, usually a weekday name in the target language
    pub day: String,
    /// Free-text warm-up description
    pub warmup: String,
    /// Main workout block
    pub workout: Workout,
    /// Free-text cool-down description
    pub cooldown: String,
}

/// Main workout block of a day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Category label (e.g. "strength", "cardio")
    #[serde(rename = "type")]
    pub workout_type: String,
    /// Total duration, strictly positive
    pub duration_minutes: f64,
    /// Exercises in execution order
    pub exercises: Vec<Exercise>,
}

/// One exercise inside a workout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Exercise name
    pub name: String,
    /// Number of sets, at least one
    pub sets: u32,
    /// Repetitions per set; `None` for time-based exercises
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Minutes per set; zero when the backend omitted it
    pub time_per_set_minutes: f64,
}

impl Exercise {
    /// Returns true when the exercise is measured in time rather than reps
    pub fn is_time_based(&self) -> bool {
        self.reps.is_none()
    }
}

impl DayPlan {
    /// Validate an untyped JSON value into a day plan
    ///
    /// Thin alias over [`validate_day_plan`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::plan::DayPlan;
    /// use serde_json::json;
    ///
    /// let plan = DayPlan::from_value(&json!({
    ///     "day": "Lunes",
    ///     "warmup": "5 min trote suave",
    ///     "workout": {
    ///         "type": "fuerza",
    ///         "durationMinutes": 40,
    ///         "exercises": [{ "name": "Sentadillas", "sets": 3, "reps": 12 }]
    ///     },
    ///     "cooldown": "Estiramientos"
    /// }))
    /// .unwrap();
    /// assert_eq!(plan.day, "Lunes");
    /// assert_eq!(plan.workout.exercises[0].time_per_set_minutes, 0.0);
    /// ```
    pub fn from_value(value: &serde_json::Value) -> std::result::Result<Self, SchemaIssues> {
        validate_day_plan(value)
    }

    /// Pretty-printed JSON form, as embedded in prompts
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Replace the day label, keeping everything else
    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.day = day.into();
        self
    }
}
