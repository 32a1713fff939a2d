use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::EstimateError;
use crate::models::Config;

/// Load `.env` from the project directory into the process environment
///
/// A missing file is ignored. Variables already set in the environment win.
pub fn load_dotenv(project_root: &Path) {
    let env_path = project_root.join(".env");
    if !env_path.exists() {
        debug!("No .env file at {}", env_path.display());
        return;
    }
    match dotenvy::from_path(&env_path) {
        Ok(()) => debug!("Loaded environment from {}", env_path.display()),
        Err(e) => warn!("Ignoring unreadable {}: {}", env_path.display(), e),
    }
}

/// Load configuration from an explicit file or the project directory, with CLI overrides
pub fn load_config(
    project_root: &Path,
    config_file: Option<&Path>,
    model: Option<String>,
    url: Option<String>,
    timeout: Option<u64>,
    max_output_tokens: Option<u32>,
) -> Result<Config, EstimateError> {
    let config = match config_file {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_from_dir(project_root)?,
    };
    let config = config.with_overrides(model, url, timeout, max_output_tokens);

    info!(
        "Configuration loaded: model={}, url={}, timeout={}s",
        config.openai.model, config.openai.url, config.openai.timeout_seconds
    );

    Ok(config)
}
