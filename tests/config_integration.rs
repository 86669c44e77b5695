//! Configuration file loading

mod common;

use common::temp_config_file;
use fitplan::cli::{Cli, Commands};
use fitplan::config::{Config, WeekDelivery};
use fitplan::locale::Locale;

#[test]
fn test_load_full_config_file() {
    let (_dir, path) = temp_config_file(
        r#"
provider:
  type: ollama
  request_timeout_seconds: 60
  ollama:
    host: http://gpu-box:11434
    model: qwen2.5:14b
generation:
  max_attempts: 5
  locale: en
server:
  host: 0.0.0.0
  port: 8080
  week_delivery: stream
client:
  base_url: http://plans.internal:8080
logging:
  level: debug
  json_format: true
"#,
    );

    let config = Config::from_file(path.to_str().unwrap()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.provider.provider_type, "ollama");
    assert_eq!(config.provider.request_timeout_seconds, 60);
    assert_eq!(config.provider.ollama.model, "qwen2.5:14b");
    assert_eq!(config.generation.max_attempts, 5);
    assert_eq!(config.generation.locale, Locale::En);
    assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
    assert_eq!(config.server.week_delivery, WeekDelivery::Stream);
    assert_eq!(config.client.base_url, "http://plans.internal:8080");
    assert!(config.logging.json_format);
}

#[test]
fn test_partial_file_uses_defaults() {
    let (_dir, path) = temp_config_file("server:\n  port: 4000\n");

    let config = Config::from_file(path.to_str().unwrap()).unwrap();

    assert_eq!(config.server.port, 4000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.provider.provider_type, "gemini");
    assert_eq!(config.generation.max_attempts, 3);
    assert_eq!(config.generation.locale, Locale::Es);
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let (_dir, path) = temp_config_file("server: [unclosed");
    let err = Config::from_file(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn test_out_of_range_attempts_fail_validation() {
    let (_dir, path) = temp_config_file("generation:\n  max_attempts: 0\n");
    let config = Config::from_file(path.to_str().unwrap()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_cli_overrides_file() {
    let (_dir, path) = temp_config_file("server:\n  port: 4000\n");
    let cli = Cli {
        config: Some(path.to_string_lossy().to_string()),
        verbose: true,
        command: Commands::Serve {
            provider: Some("ollama".to_string()),
            host: None,
            port: Some(5050),
            stream: true,
        },
    };

    let config = Config::load(path.to_str().unwrap(), &cli).unwrap();

    assert_eq!(config.server.port, 5050);
    assert_eq!(config.server.week_delivery, WeekDelivery::Stream);
    assert_eq!(config.provider.provider_type, "ollama");
    assert_eq!(config.logging.level, "debug");
}
