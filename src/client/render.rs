//! Terminal cards for day plans

use super::session::ReceivedDay;
use crate::locale::Locale;
use crate::plan::{DayPlan, Exercise};
use colored::Colorize;
use prettytable::{format, row, Table};

struct Labels {
    warmup: &'static str,
    workout: &'static str,
    cooldown: &'static str,
    exercise: &'static str,
    sets: &'static str,
    reps: &'static str,
    time: &'static str,
    minutes: &'static str,
    invalid: &'static str,
}

fn labels(locale: Locale) -> Labels {
    match locale {
        Locale::Es => Labels {
            warmup: "Calentamiento",
            workout: "Entrenamiento",
            cooldown: "Enfriamiento",
            exercise: "Ejercicio",
            sets: "Series",
            reps: "Reps",
            time: "Tiempo/serie",
            minutes: "min",
            invalid: "Plan no válido",
        },
        Locale::En => Labels {
            warmup: "Warm-up",
            workout: "Workout",
            cooldown: "Cool-down",
            exercise: "Exercise",
            sets: "Sets",
            reps: "Reps",
            time: "Time/set",
            minutes: "min",
            invalid: "Invalid plan",
        },
    }
}

fn format_minutes(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn exercise_row(exercise: &Exercise, l: &Labels) -> prettytable::Row {
    let reps = exercise
        .reps
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    let time = if exercise.time_per_set_minutes > 0.0 {
        format!("{} {}", format_minutes(exercise.time_per_set_minutes), l.minutes)
    } else {
        "-".to_string()
    };
    row![exercise.name, exercise.sets, reps, time]
}

/// Render one day as a card
pub fn render_day(plan: &DayPlan, locale: Locale) -> String {
    let l = labels(locale);
    let mut out = String::new();

    out.push_str(&format!("{}\n", plan.day.bold().cyan()));
    out.push_str(&format!("{}: {}\n", l.warmup.bold(), plan.warmup));
    out.push_str(&format!(
        "{}: {} ({} {})\n",
        l.workout.bold(),
        plan.workout.workout_type,
        format_minutes(plan.workout.duration_minutes),
        l.minutes
    ));

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(row![l.exercise.bold(), l.sets.bold(), l.reps.bold(), l.time.bold()]);
    for exercise in &plan.workout.exercises {
        table.add_row(exercise_row(exercise, &l));
    }
    out.push_str(&table.to_string());

    out.push_str(&format!("{}: {}\n", l.cooldown.bold(), plan.cooldown));
    out
}

/// Render a received entry, flagging ones that failed validation
pub fn render_received(day: &ReceivedDay, position: usize, locale: Locale) -> String {
    match day {
        ReceivedDay::Valid(plan) => render_day(plan, locale),
        ReceivedDay::Invalid { label, issues } => {
            let l = labels(locale);
            let name = label.clone().unwrap_or_else(|| format!("#{}", position));
            format!(
                "{}\n{}: {}\n",
                name.bold().cyan(),
                l.invalid.red().bold(),
                issues
            )
        }
    }
}

/// Render a whole week, one card after another
pub fn render_week(days: &[ReceivedDay], locale: Locale) -> String {
    days.iter()
        .enumerate()
        .map(|(i, day)| render_received(day, i + 1, locale))
        .collect::<Vec<_>>()
        .join("\n")
}
