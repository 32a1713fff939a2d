//! Common test utilities

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

use estimator::core::{CompletionBackend, Estimator};
use estimator::models::LimitsConfig;
use estimator::ApiError;

/// Backend that replays a canned reply and records every prompt it receives
pub struct StubBackend {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl CompletionBackend for StubBackend {
    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ApiError::from_status(*status, "stubbed failure".to_string())),
        }
    }
}

/// Estimator over a stub with default limits
pub fn stub_estimator(backend: StubBackend) -> Estimator<StubBackend> {
    Estimator::new(backend, LimitsConfig::default())
}

/// Build estimate JSON from step minutes, with the given total and range
pub fn estimate_value(total: u32, min: u32, max: u32, step_minutes: &[u32]) -> Value {
    let steps: Vec<Value> = step_minutes
        .iter()
        .enumerate()
        .map(|(i, m)| json!({"name": format!("Step {}", i + 1), "minutes": m}))
        .collect();
    json!({
        "total_minutes": total,
        "range": {"min": min, "max": max},
        "steps": steps,
        "assumptions": ["Working alone", "Tools are available"],
        "risks": ["Unclear requirements", "Interruptions"]
    })
}

/// Parse a rendered output and return the `error` field, if any
pub fn error_field(output: &str) -> Option<String> {
    let value: Value = serde_json::from_str(output).expect("output must be valid JSON");
    value.get("error").and_then(Value::as_str).map(str::to_string)
}
