//! Target language for generated plans
//!
//! The locale decides the weekday labels of a whole-week plan and the
//! phrasing of every prompt sent to the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported output languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Spanish
    #[default]
    Es,
    /// English
    En,
}

const WEEK_ES: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

const WEEK_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

impl Locale {
    /// Weekday labels, Monday through Sunday
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::locale::Locale;
    ///
    /// assert_eq!(Locale::Es.week_days()[0], "Lunes");
    /// assert_eq!(Locale::En.week_days()[6], "Sunday");
    /// ```
    pub fn week_days(&self) -> &'static [&'static str; 7] {
        match self {
            Self::Es => &WEEK_ES,
            Self::En => &WEEK_EN,
        }
    }

    /// Language name as written inside prompts
    pub fn language_name(&self) -> &'static str {
        match self {
            Self::Es => "español",
            Self::En => "English",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Es => write!(f, "es"),
            Self::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" => Ok(Self::Es),
            "en" | "english" => Ok(Self::En),
            other => Err(format!("Unsupported locale: {}. Must be one of: es, en", other)),
        }
    }
}
