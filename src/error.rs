use thiserror::Error;

use crate::models::{ConfigError, ErrorKind, ErrorResponse};

/// Main error type for the estimator
#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid task description: {0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Model did not return valid JSON: {0}")]
    Parse(String),

    #[error("Model JSON does not match the estimate schema: {0}")]
    Schema(String),

    #[error("Estimate is inconsistent: {0}")]
    Consistency(String),
}

/// Errors related to the completion API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing API key: set {0} in the environment or in a .env file")]
    MissingApiKey(String),

    #[error("API rejected credentials: {status} - {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),

    #[error("Model refused the request: {0}")]
    Refused(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl ApiError {
    /// Build the error for a non-2xx status
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 401 || status == 403 {
            ApiError::Unauthorized { status, message }
        } else {
            ApiError::HttpError { status, message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::MissingApiKey(_) | ApiError::Unauthorized { .. } => ErrorKind::Auth,
            _ => ErrorKind::Network,
        }
    }
}

/// Generic conversion; callers that know the configured timeout map it to
/// [`ApiError::Timeout`] before falling back to this.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::RequestFailed(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ApiError::ConnectionFailed(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::RequestFailed(err.to_string())
        }
    }
}

impl EstimateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EstimateError::Config(_) => ErrorKind::Config,
            EstimateError::Validation(_) => ErrorKind::Validation,
            EstimateError::Api(e) => e.kind(),
            EstimateError::Parse(_) => ErrorKind::Parse,
            EstimateError::Schema(_) => ErrorKind::Schema,
            EstimateError::Consistency(_) => ErrorKind::Consistency,
        }
    }

    /// Convert into the fallback JSON shape
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.kind(), self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EstimateError>;
