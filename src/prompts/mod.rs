//! Prompts sent to the text-generation backend
//!
//! One prompt is built per day. A generation prompt embeds the athlete
//! profile and the context of previously generated days; an edit prompt
//! additionally embeds the existing plan and the edit instructions.

pub mod day_prompt;

use crate::locale::Locale;
use crate::plan::DayPlan;
use crate::request::AthleteProfile;

/// Existing plan plus the free-text change requested for it
#[derive(Debug, Clone, Copy)]
pub struct EditDirective<'a> {
    /// Plan being edited
    pub existing_plan: &'a DayPlan,
    /// What to change
    pub instructions: &'a str,
}

/// Everything a single-day prompt embeds
#[derive(Debug, Clone, Copy)]
pub struct DayPromptInput<'a> {
    /// Day label the plan is for
    pub day: &'a str,
    /// Goals, level and equipment
    pub profile: &'a AthleteProfile,
    /// Serialized plans of earlier days in the same week, empty otherwise
    pub context: &'a str,
    /// Present only for edit requests
    pub edit: Option<EditDirective<'a>>,
}

/// Builds the prompt for one day in the given locale
///
/// # Examples
///
/// ```
/// use fitplan::locale::Locale;
/// use fitplan::prompts::{build_day_prompt, DayPromptInput};
/// use fitplan::request::AthleteProfile;
///
/// let profile = AthleteProfile::new("perder peso", "principiante", None);
/// let prompt = build_day_prompt(
///     Locale::Es,
///     &DayPromptInput { day: "Lunes", profile: &profile, context: "", edit: None },
/// );
/// assert!(prompt.contains("\"Lunes\""));
/// assert!(prompt.contains("perder peso"));
/// ```
pub fn build_day_prompt(locale: Locale, input: &DayPromptInput<'_>) -> String {
    match locale {
        Locale::Es => day_prompt::spanish(input),
        Locale::En => day_prompt::english(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_plan_value;

    fn profile(equipment: Option<&str>) -> AthleteProfile {
        AthleteProfile::new("ganar fuerza", "intermedio", equipment.map(str::to_string))
    }

    #[test]
    fn test_prompt_embeds_profile() {
        let profile = profile(Some("mancuernas, banda elástica"));
        let prompt = build_day_prompt(
            Locale::Es,
            &DayPromptInput {
                day: "Martes",
                profile: &profile,
                context: "",
                edit: None,
            },
        );

        assert!(prompt.contains("\"Martes\""));
        assert!(prompt.contains("ganar fuerza"));
        assert!(prompt.contains("\"intermedio\""));
        assert!(prompt.contains("mancuernas, banda elástica"));
        assert!(prompt.contains("español"));
    }

    #[test]
    fn test_prompt_without_equipment_says_so() {
        let profile = profile(None);
        let prompt = build_day_prompt(
            Locale::En,
            &DayPromptInput {
                day: "Monday",
                profile: &profile,
                context: "",
                edit: None,
            },
        );
        assert!(prompt.contains("no access to specific equipment"));
    }

    #[test]
    fn test_blank_equipment_treated_as_absent() {
        let profile = profile(Some("   "));
        let prompt = build_day_prompt(
            Locale::En,
            &DayPromptInput {
                day: "Monday",
                profile: &profile,
                context: "",
                edit: None,
            },
        );
        assert!(prompt.contains("no access to specific equipment"));
    }

    #[test]
    fn test_context_included_only_when_present() {
        let profile = profile(None);
        let without = build_day_prompt(
            Locale::En,
            &DayPromptInput {
                day: "Tuesday",
                profile: &profile,
                context: "",
                edit: None,
            },
        );
        let with = build_day_prompt(
            Locale::En,
            &DayPromptInput {
                day: "Tuesday",
                profile: &profile,
                context: "Day Monday: {\"day\":\"Monday\"}",
                edit: None,
            },
        );

        assert!(!without.contains("previous days"));
        assert!(with.contains("previous days"));
        assert!(with.contains("Day Monday:"));
    }

    #[test]
    fn test_edit_prompt_embeds_plan_and_instructions() {
        let profile = profile(None);
        let existing = DayPlan::from_value(&sample_plan_value("Lunes")).unwrap();
        let prompt = build_day_prompt(
            Locale::Es,
            &DayPromptInput {
                day: "Lunes",
                profile: &profile,
                context: "",
                edit: Some(EditDirective {
                    existing_plan: &existing,
                    instructions: "añade 10 minutos de cardio",
                }),
            },
        );

        assert!(prompt.contains("añade 10 minutos de cardio"));
        assert!(prompt.contains("Sentadillas"));
        assert!(prompt.contains("actualizado"));
    }

    #[test]
    fn test_prompt_forbids_explanations() {
        let profile = profile(None);
        for locale in [Locale::Es, Locale::En] {
            let prompt = build_day_prompt(
                locale,
                &DayPromptInput {
                    day: locale.week_days()[0],
                    profile: &profile,
                    context: "",
                    edit: None,
                },
            );
            assert!(prompt.contains("JSON"));
        }
    }
}
