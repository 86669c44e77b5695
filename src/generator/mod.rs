//! Day plan generation
//!
//! [`DayGenerator`] turns one prompt into one validated [`crate::plan::DayPlan`]
//! with bounded retries; [`week_stream`] folds it over the weekdays.

pub mod retry;
pub mod week;

pub use retry::{AttemptState, DayGenerator, ErrorClass, DAY_PLAN_SCHEMA_NAME};
pub use week::{generate_week, week_stream, WeekContext};
