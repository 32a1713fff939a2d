use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::estimator::CompletionBackend;
use crate::core::schema::{estimate_json_schema, SCHEMA_NAME};
use crate::core::text::preview;
use crate::error::ApiError;
use crate::models::{OpenAiConfig, OutputFormat};

/// API key passed explicitly into the client
///
/// `Debug` is redacted so the key never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank values
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Read the key from the named environment variable
    pub fn from_env(var: &str) -> Result<Self, ApiError> {
        std::env::var(var)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ApiError::MissingApiKey(var.to_string()))
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// OpenAI Responses API client
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
    api_key: ApiKey,
}

/// Request body for the responses endpoint
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    text: TextOptions,
}

#[derive(Debug, Serialize)]
struct TextOptions {
    format: TextFormat,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TextFormat {
    JsonObject,
    JsonSchema {
        name: &'static str,
        schema: Value,
        strict: bool,
    },
}

impl From<OutputFormat> for TextFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::JsonObject => TextFormat::JsonObject,
            OutputFormat::JsonSchema => TextFormat::JsonSchema {
                name: SCHEMA_NAME,
                schema: estimate_json_schema(),
                strict: true,
            },
        }
    }
}

/// Response from the responses endpoint
#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    incomplete_details: Option<IncompleteDetails>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct IncompleteDetails {
    #[serde(default)]
    reason: Option<String>,
}

/// One item of the `output` array; only `message` items carry text
#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Create a new client with the given configuration and credentials
    pub fn new(config: OpenAiConfig, api_key: ApiKey) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self::with_http_client(client, config, api_key))
    }

    fn with_http_client(client: Client, config: OpenAiConfig, api_key: ApiKey) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.config.url.trim_end_matches('/'))
    }

    /// Send a prompt and return the raw output text
    pub async fn create_response(&self, prompt: &str) -> Result<String, ApiError> {
        let url = self.endpoint();
        let request = ResponsesRequest {
            model: &self.config.model,
            input: prompt,
            max_output_tokens: self.config.max_output_tokens,
            text: TextOptions {
                format: self.config.output_format.into(),
            },
        };

        debug!("Sending responses request to {}", url);
        debug!(
            "Using model: {}, format: {:?}, max_output_tokens: {}",
            self.config.model, self.config.output_format, self.config.max_output_tokens
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    ApiError::ConnectionFailed(format!(
                        "Could not connect to {}: {}",
                        self.config.url, e
                    ))
                } else {
                    ApiError::from(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.config.timeout_seconds)
            } else {
                ApiError::from(e)
            }
        })?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), error_message(&body)));
        }

        let parsed: ResponsesResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let text = extract_output_text(parsed)?;

        info!("Received {} characters from {}", text.len(), self.config.model);
        Ok(text)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        self.create_response(prompt).await
    }
}

/// Pull the API's error message out of a failure body, falling back to the raw body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => preview(body.trim(), 200),
    }
}

/// Concatenate the text of every `output_text` part of every message item
fn extract_output_text(response: ResponsesResponse) -> Result<String, ApiError> {
    if response.status.as_deref() == Some("incomplete") {
        let reason = response
            .incomplete_details
            .and_then(|d| d.reason)
            .unwrap_or_else(|| "unknown".to_string());
        warn!("Response incomplete ({}); output may be truncated", reason);
    }

    let mut text = String::new();
    for item in response.output.into_iter().filter(|i| i.kind == "message") {
        for part in item.content {
            match part.kind.as_str() {
                "output_text" => text.push_str(part.text.as_deref().unwrap_or("")),
                "refusal" => {
                    return Err(ApiError::Refused(part.refusal.unwrap_or_default()));
                }
                other => debug!("Skipping content part of type {}", other),
            }
        }
    }

    if text.is_empty() {
        warn!("Response contained no output text");
    }
    Ok(text)
}
