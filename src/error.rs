//! Error types for abstract-triage.
//!
//! Two kinds only: [`ConfigError`] is fatal at startup, [`ClassificationError`]
//! is returned from a single classify call and recovered by the caller.
//! Library functions return these instead of using `unwrap()`.

use std::path::PathBuf;
use thiserror::Error;

/// Notification prefix shown for every failed classification.
const FAILURE_NOTICE: &str =
    "An error occurred. It could be an API quota issue or a malformed response from the model.";

/// Warning shown when the caller submits an empty abstract.
pub const EMPTY_ABSTRACT_NOTICE: &str = "Please enter an abstract to classify.";

/// Startup configuration error. Nothing downstream can run when this occurs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable API credential was found
    #[error("Google API key is missing or invalid. {hint}")]
    MissingApiKey {
        /// Where the key can be supplied
        hint: String,
    },

    /// Secrets file exists but could not be read
    #[error("Failed to read secrets file {}: {source}", .path.display())]
    SecretsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Secrets file is not valid TOML
    #[error("Failed to parse secrets file {}: {source}", .path.display())]
    SecretsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// API base URL override is not a valid URL
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// HTTP client construction failed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failure of one classify call.
///
/// Every variant collapses to the same user-facing notification (see
/// [`ClassificationError::user_message`]); none of them is retried.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// Abstract was empty or whitespace-only
    #[error("abstract text is empty")]
    EmptyAbstract,

    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Text-generation API rejected the request (quota, auth, bad request...)
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Model returned no text
    #[error("Model returned an empty response: {0}")]
    EmptyResponse(String),

    /// Model output was not valid JSON
    #[error("Malformed model output: {source} (output: {preview:?})")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        /// First 200 characters of the cleaned output
        preview: String,
    },

    /// Model output was JSON but a required field was absent, null or not a string
    #[error("Model output is missing the \"{0}\" field")]
    MissingField(&'static str),

    /// Model output carried a label outside the fixed set (strict mode only)
    #[error("Model returned an unknown label: {0:?}")]
    UnknownLabel(String),
}

impl ClassificationError {
    /// Render the single notification shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClassificationError::EmptyAbstract => EMPTY_ABSTRACT_NOTICE.to_string(),
            other => format!("{} Details: {}", FAILURE_NOTICE, other),
        }
    }

    /// True when the failure came from the caller's input rather than the model call.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, ClassificationError::EmptyAbstract)
    }
}

/// Result type alias using `ClassificationError`
pub type Result<T> = std::result::Result<T, ClassificationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_appends_details() {
        let err = ClassificationError::Api {
            status: 429,
            message: "Resource has been exhausted".to_string(),
        };
        let msg = err.user_message();
        assert!(msg.starts_with("An error occurred."));
        assert!(msg.ends_with("Details: API error: 429 - Resource has been exhausted"));
    }

    #[test]
    fn test_empty_abstract_message() {
        let err = ClassificationError::EmptyAbstract;
        assert_eq!(err.user_message(), EMPTY_ABSTRACT_NOTICE);
        assert!(err.is_caller_error());
        assert!(!ClassificationError::MissingField("label").is_caller_error());
    }

    #[test]
    fn test_missing_api_key_display() {
        let err = ConfigError::MissingApiKey {
            hint: "Set GOOGLE_API_KEY.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Google API key is missing or invalid. Set GOOGLE_API_KEY."
        );
    }
}
