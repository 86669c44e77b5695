//! In-memory week held by the terminal client
//!
//! Nothing here is persisted; the week lives as long as the session.

use crate::error::{FitplanError, Result};
use crate::plan::{DayPlan, SchemaIssue, SchemaIssues};
use crate::request::AthleteProfile;
use serde_json::Value;

/// One day as received from the service, after client-side re-validation
#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedDay {
    /// Passed validation
    Valid(DayPlan),
    /// Failed validation; kept so the slot can be regenerated
    Invalid {
        /// `day` field of the payload, when it had one
        label: Option<String>,
        /// Why it was rejected
        issues: SchemaIssues,
    },
}

impl ReceivedDay {
    /// Re-validate an untyped payload
    pub fn from_value(value: &Value) -> Self {
        match DayPlan::from_value(value) {
            Ok(plan) => Self::Valid(plan),
            Err(issues) => Self::Invalid {
                label: value.get("day").and_then(Value::as_str).map(str::to_string),
                issues,
            },
        }
    }

    /// Re-validate one NDJSON line
    pub fn from_line(line: &str) -> Self {
        match serde_json::from_str::<Value>(line) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                let mut issues = SchemaIssues::default();
                issues.push(SchemaIssue::new("", format!("Malformed JSON: {}", e)));
                Self::Invalid {
                    label: None,
                    issues,
                }
            }
        }
    }

    /// Day label, when known
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Valid(plan) => Some(&plan.day),
            Self::Invalid { label, .. } => label.as_deref(),
        }
    }

    /// Validated plan, if any
    pub fn plan(&self) -> Option<&DayPlan> {
        match self {
            Self::Valid(plan) => Some(plan),
            Self::Invalid { .. } => None,
        }
    }

    /// True when the entry passed validation
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// The client's working week
#[derive(Debug, Clone)]
pub struct WeekSession {
    profile: AthleteProfile,
    days: Vec<ReceivedDay>,
}

impl WeekSession {
    /// Empty session for `profile`
    pub fn new(profile: AthleteProfile) -> Self {
        Self {
            profile,
            days: Vec::new(),
        }
    }

    /// Profile used for every request
    pub fn profile(&self) -> &AthleteProfile {
        &self.profile
    }

    /// Replace the goals for subsequent requests
    pub fn set_goals(&mut self, goals: impl Into<String>) {
        self.profile.fitness_goals = goals.into();
    }

    /// Days in weekday order
    pub fn days(&self) -> &[ReceivedDay] {
        &self.days
    }

    /// True before the first week arrives
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Install a freshly received week
    pub fn replace_week(&mut self, days: Vec<ReceivedDay>) {
        self.days = days;
    }

    /// Slot index for a day label (case-insensitive) or a 1-based position
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::client::{ReceivedDay, WeekSession};
    /// use fitplan::request::AthleteProfile;
    /// use serde_json::json;
    ///
    /// let mut session = WeekSession::new(AthleteProfile::new("g", "l", None));
    /// session.replace_week(vec![ReceivedDay::from_value(&json!({ "day": "Lunes" }))]);
    /// assert_eq!(session.find("lunes"), Some(0));
    /// assert_eq!(session.find("1"), Some(0));
    /// assert_eq!(session.find("Martes"), None);
    /// ```
    pub fn find(&self, key: &str) -> Option<usize> {
        let key = key.trim();
        if let Ok(position) = key.parse::<usize>() {
            return (1..=self.days.len()).contains(&position).then(|| position - 1);
        }
        let key = key.to_lowercase();
        self.days
            .iter()
            .position(|d| d.label().is_some_and(|l| l.to_lowercase() == key))
    }

    /// Label to request when regenerating the slot at `index`
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.days.get(index).and_then(ReceivedDay::label)
    }

    /// Validated plan for `key`
    ///
    /// # Errors
    ///
    /// Returns error when the day is unknown, or
    /// [`FitplanError::InvalidResponse`] when its entry failed validation.
    pub fn plan_for(&self, key: &str) -> Result<&DayPlan> {
        let index = self.index_of(key)?;
        self.days[index].plan().ok_or_else(|| {
            FitplanError::InvalidResponse {
                issues: match &self.days[index] {
                    ReceivedDay::Invalid { issues, .. } => issues.clone(),
                    ReceivedDay::Valid(_) => SchemaIssues::default(),
                },
            }
            .into()
        })
    }

    /// Replace the slot for `key` with a new plan
    ///
    /// # Errors
    ///
    /// Returns error when no slot matches `key`.
    pub fn replace_day(&mut self, key: &str, plan: DayPlan) -> Result<()> {
        let index = self.index_of(key)?;
        self.days[index] = ReceivedDay::Valid(plan);
        Ok(())
    }

    fn index_of(&self, key: &str) -> Result<usize> {
        self.find(key).ok_or_else(|| {
            anyhow::anyhow!("No day named '{}' in the current week", key.trim())
        })
    }

    /// Number of entries that failed validation
    pub fn invalid_count(&self) -> usize {
        self.days.iter().filter(|d| !d.is_valid()).count()
    }
}
