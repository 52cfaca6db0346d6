//! Error types for the Intacct SDK
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.
//! Callers usually care about two kinds: [`Error::Read`] when the gateway
//! reports a failed function result, and [`Error::LimitExceeded`] when a
//! paginated view read would return more records than allowed.

use crate::response::ErrorDescriptor;
use thiserror::Error;

/// The main error type for the Intacct SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Gateway Errors
    // ============================================================================
    #[error("XML parsing error: {message}")]
    XmlParse { message: String },

    /// The gateway rejected the request envelope (control or authentication block)
    #[error("{message}{}", format_errors(.errors))]
    Response {
        message: String,
        errors: Vec<ErrorDescriptor>,
    },

    /// A function result came back with a non-success status
    #[error("{message}{}", format_errors(.errors))]
    Read {
        message: String,
        errors: Vec<ErrorDescriptor>,
    },

    #[error("Query result totalcount exceeds max_total_count parameter of {max_total_count}")]
    LimitExceeded { max_total_count: u64 },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an XML parse error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::XmlParse {
            message: message.into(),
        }
    }

    /// Create a gateway response error
    pub fn response(message: impl Into<String>, errors: Vec<ErrorDescriptor>) -> Self {
        Self::Response {
            message: message.into(),
            errors,
        }
    }

    /// Create a read error for a failed function result
    pub fn read(message: impl Into<String>, errors: Vec<ErrorDescriptor>) -> Self {
        Self::Read {
            message: message.into(),
            errors,
        }
    }

    /// Server-reported errors attached to this error, if any
    pub fn errors(&self) -> &[ErrorDescriptor] {
        match self {
            Error::Read { errors, .. } | Error::Response { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn format_errors(errors: &[ErrorDescriptor]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!(": {joined}")
}

/// Result type alias for the Intacct SDK
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("view");
        assert_eq!(err.to_string(), "Missing required config field: view");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::LimitExceeded {
            max_total_count: 100_000,
        };
        assert_eq!(
            err.to_string(),
            "Query result totalcount exceeds max_total_count parameter of 100000"
        );
    }

    #[test]
    fn test_read_error_display_with_errors() {
        let err = Error::read(
            "An error occurred trying to read view records",
            vec![ErrorDescriptor {
                error_no: Some("BL01001973".to_string()),
                description: Some("View not found".to_string()),
                ..Default::default()
            }],
        );
        assert_eq!(
            err.to_string(),
            "An error occurred trying to read view records: BL01001973 View not found"
        );
        assert_eq!(err.errors().len(), 1);
    }

    #[test]
    fn test_read_error_display_without_errors() {
        let err = Error::read("An error occurred trying to read related records", vec![]);
        assert_eq!(
            err.to_string(),
            "An error occurred trying to read related records"
        );
        assert!(err.errors().is_empty());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::read("failed", vec![]).is_retryable());
        assert!(!Error::LimitExceeded { max_total_count: 1 }.is_retryable());
    }
}
