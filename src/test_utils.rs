//! Test utilities for Fitplan
//!
//! Sample payloads and a scripted provider shared by unit tests.

use crate::error::{FitplanError, Result};
use crate::providers::{Generation, GenerationRequest, Provider};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A valid day plan payload for `day`
///
/// # Examples
///
/// ```ignore
/// let value = sample_plan_value("Lunes");
/// assert_eq!(value["day"], "Lunes");
/// ```
pub fn sample_plan_value(day: &str) -> Value {
    json!({
        "day": day,
        "warmup": "5 minutos de movilidad articular",
        "workout": {
            "type": "fuerza",
            "durationMinutes": 45,
            "exercises": [
                { "name": "Sentadillas", "sets": 3, "reps": 12, "timePerSetMinutes": 0 },
                { "name": "Plancha", "sets": 3, "timePerSetMinutes": 1 }
            ]
        },
        "cooldown": "Estiramientos de 10 minutos"
    })
}

/// One scripted backend reply
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this JSON value
    Value(Value),
    /// Fail the call with a provider error
    Fail(String),
}

/// Provider replaying a fixed script and recording every prompt
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    /// Create a provider that answers with `replies` in order
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Value(value)) => Ok(Generation::new(value)),
            Some(ScriptedReply::Fail(message)) => Err(FitplanError::Provider(message).into()),
            None => Err(FitplanError::Provider("script exhausted".to_string()).into()),
        }
    }
}
