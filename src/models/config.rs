use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "estimator.toml";

/// Configuration loaded from estimator.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Structured output mode requested from the Responses API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON mode: any JSON object, shape enforced by the prompt
    #[default]
    JsonObject,
    /// Strict structured output against the estimate JSON Schema
    JsonSchema,
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Model name to use
    #[serde(default = "default_model")]
    pub model: String,
    /// Timeout in seconds for the API request
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Upper bound on generated tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            max_output_tokens: default_max_output_tokens(),
            api_key_env: default_api_key_env(),
            output_format: OutputFormat::default(),
        }
    }
}

fn default_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum characters accepted in a task description
    #[serde(default = "default_max_task_chars")]
    pub max_task_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_task_chars: default_max_task_chars(),
        }
    }
}

fn default_max_task_chars() -> usize {
    4000
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from estimator.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        url: Option<String>,
        timeout: Option<u64>,
        max_output_tokens: Option<u32>,
    ) -> Self {
        if let Some(m) = model {
            self.openai.model = m;
        }
        if let Some(u) = url {
            self.openai.url = u;
        }
        if let Some(t) = timeout {
            self.openai.timeout_seconds = t;
        }
        if let Some(n) = max_output_tokens {
            self.openai.max_output_tokens = n;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
}
