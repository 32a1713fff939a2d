//! Backend-agnostic estimate pipeline: prompt, completion, validation.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::prompts::build_prompt;
use crate::core::text::preview;
use crate::core::validator::validate_response;
use crate::error::{ApiError, Result};
use crate::models::{Estimate, LimitsConfig};

/// A remote text-generation service that answers one prompt with raw text
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, ApiError>;
}

/// Runs a single task description through the pipeline
pub struct Estimator<B> {
    backend: B,
    limits: LimitsConfig,
}

impl<B: CompletionBackend> Estimator<B> {
    pub fn new(backend: B, limits: LimitsConfig) -> Self {
        Self { backend, limits }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Estimate a task
    ///
    /// The backend is only called once the task description has passed
    /// validation. No retries are attempted.
    pub async fn estimate(&self, task: &str) -> Result<Estimate> {
        let prompt = build_prompt(task, &self.limits)?;
        debug!("Built prompt ({} chars)", prompt.len());

        let raw = self.backend.complete(&prompt).await?;
        debug!("Raw model output: {}", preview(&raw, 200));

        let estimate = validate_response(&raw)?;
        info!(
            "Estimate ready: {} minutes ({} to {}), {} steps",
            estimate.total_minutes(),
            estimate.range().min,
            estimate.range().max,
            estimate.steps().len()
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        reply: std::result::Result<&'static str, u16>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn ok(reply: &'static str) -> Self {
            Self { reply: Ok(reply), calls: AtomicUsize::new(0) }
        }

        fn status(status: u16) -> Self {
            Self { reply: Err(status), calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl CompletionBackend for Canned {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(ApiError::from_status(status, "denied".to_string())),
            }
        }
    }

    const VALID: &str = r#"{"total_minutes": 20, "range": {"min": 15, "max": 30},
        "steps": [{"name": "Boil water", "minutes": 5}, {"name": "Cook pasta", "minutes": 15}],
        "assumptions": ["Stove available", "Pasta in pantry"], "risks": ["Overcooking", "Boil-over"]}"#;

    #[tokio::test]
    async fn test_estimate_success() {
        let estimator = Estimator::new(Canned::ok(VALID), LimitsConfig::default());
        let estimate = estimator.estimate("Cook pasta").await.unwrap();
        assert_eq!(estimate.total_minutes(), 20);
        assert_eq!(estimator.backend().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_task_skips_backend() {
        let estimator = Estimator::new(Canned::ok(VALID), LimitsConfig::default());
        let error = estimator.estimate("   ").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(estimator.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auth_failure_propagates_kind() {
        let estimator = Estimator::new(Canned::status(401), LimitsConfig::default());
        let error = estimator.estimate("Cook pasta").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Auth);
    }

    #[tokio::test]
    async fn test_server_failure_is_network_error_without_retry() {
        let estimator = Estimator::new(Canned::status(503), LimitsConfig::default());
        let error = estimator.estimate("Cook pasta").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Network);
        assert_eq!(estimator.backend().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bad_output_is_parse_error() {
        let estimator = Estimator::new(Canned::ok("not json"), LimitsConfig::default());
        let error = estimator.estimate("Cook pasta").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
    }
}
