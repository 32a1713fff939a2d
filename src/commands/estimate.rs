use dialoguer::{theme::ColorfulTheme, Input};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::core::{load_config, load_dotenv, ApiKey, CompletionBackend, Estimator, OpenAiClient};
use crate::error::{EstimateError, Result};
use crate::models::{ErrorKind, ErrorResponse, Estimate};

/// Estimate options
#[derive(Debug, Default)]
pub struct EstimateOptions {
    /// Task description (prompted for when absent)
    pub task: Option<String>,
    /// Explicit config file instead of ./estimator.toml
    pub config_file: Option<PathBuf>,
    /// Model override
    pub model: Option<String>,
    /// URL override
    pub url: Option<String>,
    /// Timeout override
    pub timeout: Option<u64>,
    /// Output token bound override
    pub max_output_tokens: Option<u32>,
}

/// Process exit code after a run
///
/// Estimation failures are reported as JSON and still exit 0; only
/// startup problems (configuration, credentials) exit non-zero.
pub const EXIT_OK: i32 = 0;
pub const EXIT_STARTUP_FAILURE: i32 = 1;

/// Run the whole pipeline and print exactly one JSON document to stdout
pub async fn run_estimate(project_root: &Path, options: EstimateOptions) -> i32 {
    let estimator = match build_estimator(project_root, &options) {
        Ok(estimator) => estimator,
        Err(e) => {
            error!("Startup failed: {}", e);
            println!("{}", e.to_response().to_pretty_json());
            return EXIT_STARTUP_FAILURE;
        }
    };

    let result = match options.task {
        Some(task) => estimator.estimate(&task).await,
        None => match read_task_description() {
            Ok(task) => estimator.estimate(&task).await,
            Err(e) => Err(e),
        },
    };

    println!("{}", render_outcome(result));
    EXIT_OK
}

fn build_estimator(
    project_root: &Path,
    options: &EstimateOptions,
) -> Result<Estimator<OpenAiClient>> {
    load_dotenv(project_root);

    let config = load_config(
        project_root,
        options.config_file.as_deref(),
        options.model.clone(),
        options.url.clone(),
        options.timeout,
        options.max_output_tokens,
    )?;

    let api_key = ApiKey::from_env(&config.openai.api_key_env)?;
    let client = OpenAiClient::new(config.openai, api_key)?;
    Ok(Estimator::new(client, config.limits))
}

/// Estimate one task and render the result, success or failure, as JSON
pub async fn estimate_to_json<B: CompletionBackend>(estimator: &Estimator<B>, task: &str) -> String {
    render_outcome(estimator.estimate(task).await)
}

/// Render an estimate, or the fallback error JSON, as pretty-printed JSON
pub fn render_outcome(result: Result<Estimate>) -> String {
    let response = match result {
        Ok(estimate) => match serde_json::to_string_pretty(&estimate) {
            Ok(json) => return json,
            Err(e) => ErrorResponse::new(ErrorKind::Internal, format!("failed to serialize estimate: {}", e)),
        },
        Err(e) => {
            info!("Estimate failed with {}: {}", e.kind(), e);
            e.to_response()
        }
    };
    response.to_pretty_json()
}

/// Prompt for the task on a terminal, or read all of piped stdin
pub fn read_task_description() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Describe the task you want to estimate")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| EstimateError::Validation(format!("could not read task description: {}", e)))
    } else {
        let mut task = String::new();
        stdin
            .lock()
            .read_to_string(&mut task)
            .map_err(|e| EstimateError::Validation(format!("could not read task description: {}", e)))?;
        Ok(task)
    }
}
