//! Shared helpers for integration tests

use async_trait::async_trait;
use fitplan::config::{GenerationConfig, WeekDelivery};
use fitplan::error::{FitplanError, Result};
use fitplan::providers::{Generation, GenerationRequest, Provider};
use fitplan::PlanService;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// A valid day plan payload labelled `day`
#[allow(dead_code)]
pub fn plan_value(day: &str) -> Value {
    json!({
        "day": day,
        "warmup": "5 minutos de trote suave",
        "workout": {
            "type": "fuerza",
            "durationMinutes": 40,
            "exercises": [
                { "name": "Sentadillas", "sets": 4, "reps": 10, "timePerSetMinutes": 0 },
                { "name": "Plancha", "sets": 3, "reps": null, "timePerSetMinutes": 1 }
            ]
        },
        "cooldown": "Estiramientos"
    })
}

/// Plan payloads for every day of the Spanish week
#[allow(dead_code)]
pub fn spanish_week() -> Vec<Value> {
    ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"]
        .iter()
        .map(|d| plan_value(d))
        .collect()
}

/// Provider that answers from a queue; `None` entries fail the call
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct QueueProvider {
    replies: Arc<Mutex<VecDeque<Option<Value>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl QueueProvider {
    pub fn new(replies: Vec<Option<Value>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for QueueProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match self.replies.lock().unwrap().pop_front().flatten() {
            Some(value) => Ok(Generation::new(value)),
            None => Err(FitplanError::Provider("backend unavailable".to_string()).into()),
        }
    }

    fn get_current_model(&self) -> Result<String> {
        Ok("queue-model".to_string())
    }
}

/// Service over a queue provider with the given delivery and attempt budget
#[allow(dead_code)]
pub fn queue_service(
    replies: Vec<Option<Value>>,
    delivery: WeekDelivery,
    max_attempts: u32,
) -> (Arc<PlanService>, QueueProvider) {
    let provider = QueueProvider::new(replies);
    let generation = GenerationConfig {
        max_attempts,
        ..GenerationConfig::default()
    };
    let service = PlanService::new(Arc::new(provider.clone()), "queue", &generation, delivery);
    (Arc::new(service), provider)
}
