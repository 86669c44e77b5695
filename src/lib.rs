//! Fitplan - weekly workout plan generation library
//!
//! This library provides the plan generation service, which asks an LLM
//! backend for one structured day plan at a time, and the terminal client
//! that requests, displays and edits those plans over HTTP.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `plan`: Day plan data model and schema validation
//! - `request`: Plan request contract (`generate` day/week, `edit`)
//! - `prompts`: Localized prompt construction
//! - `providers`: LLM backend abstraction and implementations (Gemini, Ollama)
//! - `generator`: Per-day retry loop and sequential week generation
//! - `service`: Request dispatch over the generator
//! - `server`: HTTP surface (`POST /api/fitness-plan`)
//! - `client`: HTTP client, session state and terminal rendering
//! - `config`: Configuration management and validation
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use fitplan::{cli::Cli, Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Cli::default())?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod locale;
pub mod logging;
pub mod plan;
pub mod prompts;
pub mod providers;
pub mod request;
pub mod server;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{FitplanError, Result};
pub use locale::Locale;
pub use plan::DayPlan;
pub use request::{AthleteProfile, PlanRequest};
pub use service::PlanService;

#[cfg(test)]
pub mod test_utils;
