use thiserror::Error;

/// Errors raised by the Solr client, the engine adapter and configuration loading
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (permanent failures)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // I/O errors (potentially transient)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors (usually permanent)
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // Network errors, passed through from the HTTP client untouched
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // Server-side errors reported by Solr
    #[error("Solr error: {code} - {message}")]
    Solr { code: u16, message: String },

    // Client errors (permanent - don't retry)
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    // Parse errors
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },
}

/// Error categorization for callers that want to retry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Permanent errors - should not retry
    Permanent,
    /// Transient errors - safe to retry
    Transient,
}

impl Error {
    /// Categorize error for retry logic
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_)
            | Self::InvalidInput { .. }
            | Self::Parse { .. }
            | Self::Url(_)
            | Self::Serde(_) => ErrorCategory::Permanent,

            Self::Http(_) | Self::Io(_) => ErrorCategory::Transient,

            Self::Solr { code, .. } => match *code {
                // 4xx: malformed document or query, resending won't help
                400..=499 => ErrorCategory::Permanent,
                _ => ErrorCategory::Transient,
            },
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solr_error_categories() {
        let bad_request = Error::Solr {
            code: 400,
            message: "undefined field foo".to_string(),
        };
        assert_eq!(bad_request.category(), ErrorCategory::Permanent);
        assert!(!bad_request.is_retryable());

        let unavailable = Error::Solr {
            code: 503,
            message: "no servers hosting shard".to_string(),
        };
        assert_eq!(unavailable.category(), ErrorCategory::Transient);
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("endpoint", "endpoint cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input: endpoint - endpoint cannot be empty"
        );
        assert!(!err.is_retryable());
    }
}
