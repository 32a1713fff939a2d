use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of failure reported in the fallback JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Task description was empty or unusable
    Validation,
    /// API rejected or lacked credentials
    Auth,
    /// API call could not complete
    Network,
    /// Model output was not valid JSON
    Parse,
    /// Model JSON had missing, extra or mis-typed keys
    Schema,
    /// Breakdown or range arithmetic did not add up
    Consistency,
    /// Configuration file could not be loaded
    Config,
    /// Unexpected panic
    Internal,
}

impl ErrorKind {
    /// Get the name emitted in the `error` field
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Auth => "AuthError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Schema => "SchemaError",
            ErrorKind::Consistency => "ConsistencyError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
