//! Plan request contract
//!
//! Parses the raw JSON body accepted by the plan service into a typed
//! [`PlanRequest`]. Parsing runs in two stages: first a shape check that
//! collects every field issue, then action-specific rules.

use crate::error::{FitplanError, Result};
use crate::plan::validate::{expect_object, read_optional_string, read_string};
use crate::plan::{validate::validate_day_plan_at, DayPlan, SchemaIssues};
use serde::Serialize;
use serde_json::{Map, Value};

/// Who the plan is for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteProfile {
    /// Free-text goals
    pub fitness_goals: String,
    /// Free-text fitness level
    pub fitness_level: String,
    /// Free-text equipment list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_equipment: Option<String>,
}

impl AthleteProfile {
    /// Create a profile
    pub fn new(
        fitness_goals: impl Into<String>,
        fitness_level: impl Into<String>,
        available_equipment: Option<String>,
    ) -> Self {
        Self {
            fitness_goals: fitness_goals.into(),
            fitness_level: fitness_level.into(),
            available_equipment,
        }
    }
}

/// Known values of the `action` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Produce a new day or week
    Generate,
    /// Rework an existing day
    Edit,
}

/// A validated plan request
#[derive(Debug, Clone, PartialEq)]
pub enum PlanRequest {
    /// Generate one named day
    GenerateDay {
        /// Athlete profile
        profile: AthleteProfile,
        /// Day label
        day: String,
    },
    /// Generate the seven days of the week in order
    GenerateWeek {
        /// Athlete profile
        profile: AthleteProfile,
    },
    /// Rework an existing day following free-text instructions
    Edit {
        /// Athlete profile
        profile: AthleteProfile,
        /// Day label
        day: String,
        /// Plan being edited
        existing_plan: DayPlan,
        /// Requested change
        instructions: String,
    },
}

impl PlanRequest {
    /// Parse and validate a raw request body
    ///
    /// # Errors
    ///
    /// - [`FitplanError::InvalidRequest`] when the body does not have the
    ///   request shape (missing/ill-typed `action`, ill-typed fields, or an
    ///   `existingPlan` that is not a valid day plan)
    /// - [`FitplanError::UnrecognizedAction`] for an `action` string outside
    ///   `generate`/`edit`
    /// - [`FitplanError::MissingFields`] for an edit without `day`,
    ///   `existingPlan` and `editInstructions`
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::request::PlanRequest;
    /// use serde_json::json;
    ///
    /// let request = PlanRequest::from_value(&json!({
    ///     "action": "generate",
    ///     "fitnessGoals": "lose weight",
    ///     "fitnessLevel": "beginner",
    ///     "day": "Lunes"
    /// }))
    /// .unwrap();
    /// assert!(matches!(request, PlanRequest::GenerateDay { ref day, .. } if day == "Lunes"));
    /// ```
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut issues = SchemaIssues::default();
        let Some(obj) = expect_object(value, "", &mut issues) else {
            return Err(FitplanError::InvalidRequest { issues }.into());
        };

        let action = read_string(obj, "", "action", &mut issues);
        if let Some(action) = action.as_deref() {
            parse_action(action)?;
        }
        let is_edit = action.as_deref() == Some("edit");

        // Edits carry their own plan, so the profile is optional there
        let (goals, level) = if is_edit {
            (
                read_optional_string(obj, "", "fitnessGoals", &mut issues).map(Option::unwrap_or_default),
                read_optional_string(obj, "", "fitnessLevel", &mut issues).map(Option::unwrap_or_default),
            )
        } else {
            (
                read_string(obj, "", "fitnessGoals", &mut issues),
                read_string(obj, "", "fitnessLevel", &mut issues),
            )
        };
        let equipment = read_optional_string(obj, "", "availableEquipment", &mut issues);
        // Blank labels and instructions count as absent
        let day = read_optional_string(obj, "", "day", &mut issues).map(non_blank);
        let instructions =
            read_optional_string(obj, "", "editInstructions", &mut issues).map(non_blank);
        let existing_plan = read_existing_plan(obj, &mut issues);

        if !issues.is_empty() {
            return Err(FitplanError::InvalidRequest { issues }.into());
        }

        let (Some(action), Some(goals), Some(level), Some(equipment), Some(day), Some(instructions), Some(existing_plan)) =
            (action, goals, level, equipment, day, instructions, existing_plan)
        else {
            return Err(FitplanError::InvalidRequest { issues }.into());
        };

        let profile = AthleteProfile::new(goals, level, equipment);
        match parse_action(&action)? {
            Action::Generate => Ok(match day {
                Some(day) => Self::GenerateDay { profile, day },
                None => Self::GenerateWeek { profile },
            }),
            Action::Edit => match (day, existing_plan, instructions) {
                (Some(day), Some(existing_plan), Some(instructions)) => Ok(Self::Edit {
                    profile,
                    day,
                    existing_plan,
                    instructions,
                }),
                (day, plan, instructions) => {
                    let missing: Vec<&str> = [
                        ("day", day.is_none()),
                        ("existingPlan", plan.is_none()),
                        ("editInstructions", instructions.is_none()),
                    ]
                    .into_iter()
                    .filter_map(|(name, absent)| absent.then_some(name))
                    .collect();
                    Err(FitplanError::MissingFields(missing.join(", ")).into())
                }
            },
        }
    }

    /// The action this request performs
    pub fn action(&self) -> Action {
        match self {
            Self::GenerateDay { .. } | Self::GenerateWeek { .. } => Action::Generate,
            Self::Edit { .. } => Action::Edit,
        }
    }

    /// Athlete profile carried by the request
    pub fn profile(&self) -> &AthleteProfile {
        match self {
            Self::GenerateDay { profile, .. }
            | Self::GenerateWeek { profile }
            | Self::Edit { profile, .. } => profile,
        }
    }

    /// Serialize back to the wire shape
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "action".to_string(),
            serde_json::to_value(self.action()).unwrap_or(Value::Null),
        );
        let profile = self.profile();
        obj.insert("fitnessGoals".to_string(), Value::String(profile.fitness_goals.clone()));
        obj.insert("fitnessLevel".to_string(), Value::String(profile.fitness_level.clone()));
        if let Some(equipment) = &profile.available_equipment {
            obj.insert("availableEquipment".to_string(), Value::String(equipment.clone()));
        }
        match self {
            Self::GenerateDay { day, .. } => {
                obj.insert("day".to_string(), Value::String(day.clone()));
            }
            Self::GenerateWeek { .. } => {}
            Self::Edit {
                day,
                existing_plan,
                instructions,
                ..
            } => {
                obj.insert("day".to_string(), Value::String(day.clone()));
                obj.insert(
                    "existingPlan".to_string(),
                    serde_json::to_value(existing_plan).unwrap_or(Value::Null),
                );
                obj.insert("editInstructions".to_string(), Value::String(instructions.clone()));
            }
        }
        Value::Object(obj)
    }
}

fn parse_action(action: &str) -> Result<Action> {
    match action {
        "generate" => Ok(Action::Generate),
        "edit" => Ok(Action::Edit),
        other => Err(FitplanError::UnrecognizedAction(other.to_string()).into()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn read_existing_plan(obj: &Map<String, Value>, issues: &mut SchemaIssues) -> Option<Option<DayPlan>> {
    match obj.get("existingPlan") {
        None | Some(Value::Null) => Some(None),
        Some(value) => match validate_day_plan_at(value, "existingPlan") {
            Ok(plan) => Some(Some(plan)),
            Err(plan_issues) => {
                issues.extend(plan_issues);
                None
            }
        },
    }
}
