use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while updating Codey
#[derive(Error, Debug)]
pub enum CodeyError {
    /// Missing or invalid configuration (token, target, URLs)
    #[error("Configuration error: {0}")]
    ConfigurationError(Arc<String>),

    /// Transport-level failure talking to the API
    #[error("Network error: {0}")]
    NetworkError(Arc<String>),

    /// Non-2xx response from the REST API
    #[error("GitHub API error {status} at {url}: {body}")]
    ApiError {
        status: u16,
        url: Arc<String>,
        body: Arc<String>,
    },

    /// GraphQL response carried an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQlError(Arc<String>),

    /// Response body was not the JSON shape we expected
    #[error("Parse error: {0}")]
    ParseError(Arc<String>),

    /// Error when serializing state or reports
    #[error("Serialization error: {0}")]
    SerializationError(Arc<String>),

    /// Error when writing an artifact
    #[error("Failed to write file {path}: {message}")]
    FileWriteError { path: PathBuf, message: Arc<String> },

    /// Prestige was requested but requirements are not met
    #[error("Prestige not available, missing: {}", missing.join(", "))]
    PrestigeUnavailable { missing: Arc<Vec<String>> },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for Result with CodeyError
pub type Result<T> = std::result::Result<T, CodeyError>;

impl CodeyError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError(Arc::new(message.into()))
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError(Arc::new(message.into()))
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError(Arc::new(message.into()))
    }
}

impl From<serde_json::Error> for CodeyError {
    fn from(error: serde_json::Error) -> Self {
        CodeyError::SerializationError(Arc::new(error.to_string()))
    }
}

/// Recovery helpers for the degrade-and-continue policy
pub struct ErrorRecovery;

impl ErrorRecovery {
    /// Replace a failed result with a default value, logging the failure
    pub fn with_default<T>(result: Result<T>, default: T, context: &str) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Treating {} as empty: {}", context, e);
                default
            }
        }
    }

    /// Like `with_default`, using `T::default()`
    pub fn or_empty<T: Default>(result: Result<T>, context: &str) -> T {
        Self::with_default(result, T::default(), context)
    }
}

/// Enable cloning for CodeyError
impl Clone for CodeyError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigurationError(msg) => Self::ConfigurationError(Arc::clone(msg)),
            Self::NetworkError(msg) => Self::NetworkError(Arc::clone(msg)),
            Self::ApiError { status, url, body } => Self::ApiError {
                status: *status,
                url: Arc::clone(url),
                body: Arc::clone(body),
            },
            Self::GraphQlError(msg) => Self::GraphQlError(Arc::clone(msg)),
            Self::ParseError(msg) => Self::ParseError(Arc::clone(msg)),
            Self::SerializationError(msg) => Self::SerializationError(Arc::clone(msg)),
            Self::FileWriteError { path, message } => Self::FileWriteError {
                path: path.clone(),
                message: Arc::clone(message),
            },
            Self::PrestigeUnavailable { missing } => Self::PrestigeUnavailable {
                missing: Arc::clone(missing),
            },
            Self::IoError(err) => Self::IoError(std::io::Error::new(err.kind(), err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_default_keeps_ok_value() {
        let value = ErrorRecovery::with_default(Ok(5), 0, "test");
        assert_eq!(value, 5);
    }

    #[test]
    fn test_or_empty_on_failure() {
        let failed: Result<Vec<u32>> = Err(CodeyError::network("connection reset"));
        assert!(ErrorRecovery::or_empty(failed, "events").is_empty());
    }

    #[test]
    fn test_api_error_display() {
        let err = CodeyError::ApiError {
            status: 404,
            url: Arc::new("https://api.github.com/users/nobody".to_string()),
            body: Arc::new("Not Found".to_string()),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.clone().to_string().contains("Not Found"));
    }

    #[test]
    fn test_prestige_unavailable_lists_missing() {
        let err = CodeyError::PrestigeUnavailable {
            missing: Arc::new(vec!["min_years".to_string(), "min_total_stars".to_string()]),
        };
        assert_eq!(
            err.to_string(),
            "Prestige not available, missing: min_years, min_total_stars"
        );
    }
}
