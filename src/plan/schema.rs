//! JSON Schema declaration of the day plan shape
//!
//! Sent to backends that support schema-constrained generation. The
//! authoritative check is still [`super::validate_day_plan`]; a backend may
//! ignore or only partially honor this schema.

use serde_json::{json, Value};

/// JSON Schema (draft 2020-12 subset) for a day plan
///
/// # Examples
///
/// ```
/// use fitplan::plan::day_plan_json_schema;
///
/// let schema = day_plan_json_schema();
/// assert_eq!(schema["type"], "object");
/// assert_eq!(schema["required"][0], "day");
/// ```
pub fn day_plan_json_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "day": { "type": "string" },
            "warmup": { "type": "string" },
            "workout": {
                "type": "object",
                "properties": {
                    "type": { "type": "string" },
                    "durationMinutes": { "type": "number" },
                    "exercises": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "sets": { "type": "integer" },
                                "reps": { "type": ["integer", "null"] },
                                "timePerSetMinutes": { "type": ["number", "null"] }
                            },
                            "required": ["name", "sets"]
                        }
                    }
                },
                "required": ["type", "durationMinutes", "exercises"]
            },
            "cooldown": { "type": "string" }
        },
        "required": ["day", "warmup", "workout", "cooldown"]
    })
}
