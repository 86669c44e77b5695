//! Localized day prompt templates

use super::DayPromptInput;

fn equipment<'a>(input: &'a DayPromptInput<'a>) -> Option<&'a str> {
    input
        .profile
        .available_equipment
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
}

/// Spanish prompt
pub(crate) fn spanish(input: &DayPromptInput<'_>) -> String {
    let equipment_line = match equipment(input) {
        Some(items) => format!("El usuario dispone del siguiente equipo: {}.", items),
        None => "El usuario no tiene acceso a equipo específico.".to_string(),
    };

    let mut prompt = format!(
        r#"Genera un plan de entrenamiento estructurado en formato JSON para el día "{day}".
Objetivos de fitness del usuario: {goals}.
Nivel de condición física del usuario: "{level}".
{equipment_line}
El plan debe incluir "warmup", "workout" y "cooldown".
"#,
        day = input.day,
        goals = input.profile.fitness_goals,
        level = input.profile.fitness_level,
    );

    if !input.context.trim().is_empty() {
        prompt.push_str(&format!(
            "Planes ya generados para los días anteriores de la semana (varía los estímulos y mantén la progresión):\n{}\n",
            input.context
        ));
    }

    if let Some(edit) = input.edit {
        prompt.push_str(&format!(
            "Plan de entrenamiento existente para este día:\n{}\nInstrucciones para modificar el plan:\n{}\nDevuelve el plan completo actualizado.\n",
            edit.existing_plan.to_pretty_json(),
            edit.instructions
        ));
    }

    prompt.push_str(
        "Responde únicamente con un objeto JSON válido, sin explicaciones ni texto adicional. Responde en español.\n",
    );
    prompt
}

/// English prompt
pub(crate) fn english(input: &DayPromptInput<'_>) -> String {
    let equipment_line = match equipment(input) {
        Some(items) => format!("The user has the following equipment: {}.", items),
        None => "The user has no access to specific equipment.".to_string(),
    };

    let mut prompt = format!(
        r#"Generate a structured workout plan in JSON format for the day "{day}".
The user's fitness goals: {goals}.
The user's fitness level: "{level}".
{equipment_line}
The plan must include "warmup", "workout" and "cooldown".
"#,
        day = input.day,
        goals = input.profile.fitness_goals,
        level = input.profile.fitness_level,
    );

    if !input.context.trim().is_empty() {
        prompt.push_str(&format!(
            "Plans already generated for the previous days of the week (vary the stimulus and keep a sensible progression):\n{}\n",
            input.context
        ));
    }

    if let Some(edit) = input.edit {
        prompt.push_str(&format!(
            "Existing workout plan for this day:\n{}\nInstructions for changing the plan:\n{}\nReturn the complete updated plan.\n",
            edit.existing_plan.to_pretty_json(),
            edit.instructions
        ));
    }

    prompt.push_str(
        "Respond only with a single valid JSON object, with no explanations or extra text. Respond in English.\n",
    );
    prompt
}
