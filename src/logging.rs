//! Structured logging setup
//!
//! Provides JSON-formatted and human-readable logging with optional file
//! output. Console output goes to STDERR so client commands can print plans
//! on STDOUT without interleaving.

use crate::config::LoggingConfig;
use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
///
/// A bare level such as `info` is scoped to this crate so dependency chatter
/// (hyper, reqwest) stays at `warn`.
fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,fitplan={}", level)
    };
    Ok(EnvFilter::try_new(directive)?)
}

/// Initialize logging based on configuration.
///
/// # Arguments
///
/// * `config` - Logging configuration
///
/// # Errors
///
/// Returns error if the level is not a valid filter directive, the log file
/// cannot be opened, or a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use fitplan::config::LoggingConfig;
/// use fitplan::logging::init_logging;
///
/// let config = LoggingConfig {
///     level: "debug".to_string(),
///     json_format: true,
///     file_path: None,
/// };
///
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(&config.level)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        let console_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(Arc::new(file));

            registry.with(console_layer).with(file_layer).try_init()?;
        } else {
            registry.with(console_layer).try_init()?;
        }
    } else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));

            registry.with(console_layer).with(file_layer).try_init()?;
        } else {
            registry.with(console_layer).try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_is_scoped_to_crate() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = build_env_filter("debug").unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("fitplan=debug"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    fn test_full_directive_is_kept() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = build_env_filter("fitplan=trace,tower_http=debug").unwrap();
        assert!(filter.to_string().contains("tower_http=debug"));
    }

    #[test]
    fn test_invalid_directive_is_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(build_env_filter("fitplan=loud").is_err());
    }
}
