//! Structural validation of untyped JSON into [`DayPlan`]
//!
//! Backend output and client-received payloads arrive as `serde_json::Value`.
//! The functions here walk that value, collect every violation with its
//! dotted path, and only build a typed plan when no violation was found.

use super::{DayPlan, Exercise, SchemaIssues, Workout};
use serde_json::{Map, Value};

/// Validate a JSON value against the day plan shape
///
/// Rules:
/// - `day`, `warmup`, `cooldown`, `workout.type` and each exercise `name` are strings
/// - `workout.durationMinutes` is a number greater than zero
/// - `workout.exercises` is a non-empty array
/// - `sets` is an integer of at least one
/// - `reps` is an optional (absent or null) integer of zero or more
/// - `timePerSetMinutes` is an optional non-negative number, defaulting to 0
///
/// # Errors
///
/// Returns every issue found, not only the first one.
///
/// # Examples
///
/// ```
/// use fitplan::plan::validate_day_plan;
/// use serde_json::json;
///
/// let issues = validate_day_plan(&json!({ "day": "Lunes" })).unwrap_err();
/// assert!(issues.mentions("warmup"));
/// assert!(issues.mentions("workout"));
/// ```
pub fn validate_day_plan(value: &Value) -> std::result::Result<DayPlan, SchemaIssues> {
    validate_day_plan_at(value, "")
}

/// Same as [`validate_day_plan`], with every issue path prefixed by `prefix`
pub(crate) fn validate_day_plan_at(
    value: &Value,
    prefix: &str,
) -> std::result::Result<DayPlan, SchemaIssues> {
    let mut issues = SchemaIssues::default();

    let Some(obj) = expect_object(value, prefix, &mut issues) else {
        return Err(issues);
    };

    let day = read_string(obj, prefix, "day", &mut issues);
    let warmup = read_string(obj, prefix, "warmup", &mut issues);
    let workout = read_workout(obj, prefix, &mut issues);
    let cooldown = read_string(obj, prefix, "cooldown", &mut issues);

    match (day, warmup, workout, cooldown) {
        (Some(day), Some(warmup), Some(workout), Some(cooldown)) if issues.is_empty() => {
            Ok(DayPlan {
                day,
                warmup,
                workout,
                cooldown,
            })
        }
        _ => Err(issues),
    }
}

fn read_workout(obj: &Map<String, Value>, prefix: &str, issues: &mut SchemaIssues) -> Option<Workout> {
    let path = join(prefix, "workout");
    let Some(value) = obj.get("workout") else {
        issues.add(path, "Required");
        return None;
    };
    let workout = expect_object(value, &path, issues)?;

    let workout_type = read_string(workout, &path, "type", issues);
    let duration_minutes = read_number(workout, &path, "durationMinutes", issues);
    if let Some(duration) = duration_minutes {
        if duration <= 0.0 {
            issues.add(
                join(&path, "durationMinutes"),
                "Number must be greater than 0",
            );
        }
    }

    let exercises_path = join(&path, "exercises");
    let exercises = match workout.get("exercises") {
        None => {
            issues.add(exercises_path, "Required");
            None
        }
        Some(Value::Array(items)) => {
            if items.is_empty() {
                issues.add(exercises_path.clone(), "Array must contain at least 1 element(s)");
            }
            let parsed: Vec<Option<Exercise>> = items
                .iter()
                .enumerate()
                .map(|(idx, item)| read_exercise(item, &join(&exercises_path, &idx.to_string()), issues))
                .collect();
            parsed.into_iter().collect::<Option<Vec<_>>>()
        }
        Some(other) => {
            issues.add(exercises_path, expected("array", other));
            None
        }
    };

    Some(Workout {
        workout_type: workout_type?,
        duration_minutes: duration_minutes?,
        exercises: exercises?,
    })
}

fn read_exercise(value: &Value, path: &str, issues: &mut SchemaIssues) -> Option<Exercise> {
    let obj = expect_object(value, path, issues)?;

    let name = read_string(obj, path, "name", issues);
    let sets = read_positive_integer(obj, path, "sets", issues);
    let reps = read_optional_integer(obj, path, "reps", 0, issues);
    let time_per_set_minutes = read_optional_number(obj, path, "timePerSetMinutes", issues);
    if let Some(Some(minutes)) = time_per_set_minutes {
        if minutes < 0.0 {
            issues.add(
                join(path, "timePerSetMinutes"),
                "Number must be greater than or equal to 0",
            );
        }
    }

    Some(Exercise {
        name: name?,
        sets: sets?,
        reps: reps?,
        time_per_set_minutes: time_per_set_minutes?.unwrap_or(0.0),
    })
}

pub(crate) fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(kind: &str, got: &Value) -> String {
    format!("Expected {}, received {}", kind, type_name(got))
}

pub(crate) fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    issues: &mut SchemaIssues,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(obj),
        other => {
            issues.add(path, expected("object", other));
            None
        }
    }
}

pub(crate) fn read_string(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    issues: &mut SchemaIssues,
) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.add(join(prefix, key), expected("string", other));
            None
        }
        None => {
            issues.add(join(prefix, key), "Required");
            None
        }
    }
}

/// Optional string: absent or null yields `Some(None)`
pub(crate) fn read_optional_string(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    issues: &mut SchemaIssues,
) -> Option<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(other) => {
            issues.add(join(prefix, key), expected("string", other));
            None
        }
    }
}

fn read_number(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    issues: &mut SchemaIssues,
) -> Option<f64> {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            issues.add(join(prefix, key), expected("number", other));
            None
        }
        None => {
            issues.add(join(prefix, key), "Required");
            None
        }
    }
}

fn read_optional_number(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    issues: &mut SchemaIssues,
) -> Option<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::Number(n)) => Some(n.as_f64()),
        Some(other) => {
            issues.add(join(prefix, key), expected("number", other));
            None
        }
    }
}

/// Whole numbers encoded as floats (`3.0`) are accepted
fn as_whole_number(value: &Value) -> Option<i64> {
    let n = value.as_f64()?;
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

fn integer_at_least(value: &Value, min: i64, path: String, issues: &mut SchemaIssues) -> Option<u32> {
    if !value.is_number() {
        issues.add(path, expected("integer", value));
        return None;
    }
    match as_whole_number(value) {
        None => {
            issues.add(path, "Expected integer, received float");
            None
        }
        Some(n) if n < min => {
            if min == 1 {
                issues.add(path, "Number must be greater than 0");
            } else {
                issues.add(path, format!("Number must be greater than or equal to {}", min));
            }
            None
        }
        Some(n) => match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                issues.add(path, "Number is too large");
                None
            }
        },
    }
}

fn read_positive_integer(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    issues: &mut SchemaIssues,
) -> Option<u32> {
    match obj.get(key) {
        Some(value) => integer_at_least(value, 1, join(prefix, key), issues),
        None => {
            issues.add(join(prefix, key), "Required");
            None
        }
    }
}

fn read_optional_integer(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    min: i64,
    issues: &mut SchemaIssues,
) -> Option<Option<u32>> {
    match obj.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(value) => integer_at_least(value, min, join(prefix, key), issues).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_plan_value;
    use serde_json::json;

    #[test]
    fn test_valid_plan_parses() {
        let plan = validate_day_plan(&sample_plan_value("Lunes")).unwrap();
        assert_eq!(plan.day, "Lunes");
        assert_eq!(plan.workout.exercises.len(), 2);
        assert_eq!(plan.workout.exercises[0].reps, Some(12));
    }

    #[test]
    fn test_time_per_set_defaults_to_zero_when_absent() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"][0]
            .as_object_mut()
            .unwrap()
            .remove("timePerSetMinutes");
        value["workout"]["exercises"][0]["reps"] = Value::Null;

        let plan = validate_day_plan(&value).unwrap();
        let exercise = &plan.workout.exercises[0];
        assert_eq!(exercise.reps, None);
        assert_eq!(exercise.time_per_set_minutes, 0.0);
    }

    #[test]
    fn test_null_time_per_set_defaults_to_zero() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"][1]["timePerSetMinutes"] = Value::Null;
        let plan = validate_day_plan(&value).unwrap();
        assert_eq!(plan.workout.exercises[1].time_per_set_minutes, 0.0);
    }

    #[test]
    fn test_whole_float_sets_accepted() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"][0]["sets"] = json!(3.0);
        let plan = validate_day_plan(&value).unwrap();
        assert_eq!(plan.workout.exercises[0].sets, 3);
    }

    #[test]
    fn test_fractional_sets_rejected() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"][0]["sets"] = json!(2.5);
        let issues = validate_day_plan(&value).unwrap_err();
        assert!(issues.mentions("workout.exercises.0.sets"));
    }

    #[test]
    fn test_zero_sets_rejected() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"][1]["sets"] = json!(0);
        let issues = validate_day_plan(&value).unwrap_err();
        assert!(issues.mentions("workout.exercises.1.sets"));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["durationMinutes"] = json!(0);
        let issues = validate_day_plan(&value).unwrap_err();
        assert!(issues.mentions("workout.durationMinutes"));
    }

    #[test]
    fn test_empty_exercises_rejected() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"] = json!([]);
        let issues = validate_day_plan(&value).unwrap_err();
        assert!(issues.mentions("workout.exercises"));
    }

    #[test]
    fn test_collects_all_issues() {
        let issues = validate_day_plan(&json!({
            "day": 1,
            "warmup": "ok",
            "workout": { "type": "cardio", "durationMinutes": "thirty", "exercises": [{ "sets": 3 }] }
        }))
        .unwrap_err();

        assert!(issues.mentions("day"));
        assert!(issues.mentions("workout.durationMinutes"));
        assert!(issues.mentions("workout.exercises.0.name"));
        assert!(issues.mentions("cooldown"));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_wrong_type_message() {
        let issues = validate_day_plan(&json!([])).unwrap_err();
        assert_eq!(issues.to_string(), "Expected object, received array");
    }

    #[test]
    fn test_prefix_applied_to_paths() {
        let issues = validate_day_plan_at(&json!({}), "existingPlan").unwrap_err();
        assert!(issues.mentions("existingPlan.day"));
        assert!(issues.mentions("existingPlan.workout"));
    }

    #[test]
    fn test_zero_reps_accepted() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"][0]["reps"] = json!(0);
        value["workout"]["exercises"][0]["timePerSetMinutes"] = json!(1);
        let plan = validate_day_plan(&value).unwrap();
        assert_eq!(plan.workout.exercises[0].reps, Some(0));
    }

    #[test]
    fn test_negative_reps_rejected() {
        let mut value = sample_plan_value("Lunes");
        value["workout"]["exercises"][0]["reps"] = json!(-4);
        let issues = validate_day_plan(&value).unwrap_err();
        assert!(issues.mentions("workout.exercises.0.reps"));
    }
}
