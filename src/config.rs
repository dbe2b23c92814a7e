//! Runtime configuration.
//!
//! The only secret is the Google API key. It is resolved once at startup and
//! passed to the Gemini client explicitly; nothing reads it from globals later.
//!
//! Resolution order for the key:
//! 1. `--api-key` flag or `GOOGLE_API_KEY` (a `.env` file is loaded first)
//! 2. `google_api_key` in the secrets TOML file (`secrets.toml` by default)

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable overriding the secrets file path
pub const SECRETS_FILE_ENV: &str = "TRIAGE_SECRETS_FILE";

/// Environment variable overriding the Gemini API base URL
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Secrets file read when no path is given
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Default Gemini API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// API key wrapper that never prints its value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank values.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key, for the request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Secrets TOML layout
#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    google_api_key: Option<String>,
}

/// Raw configuration inputs, as collected from CLI flags and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub api_key: Option<String>,
    pub secrets_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub strict_labels: bool,
}

/// Validated configuration for a classifier instance
#[derive(Debug, Clone)]
pub struct TriageConfig {
    pub api_key: ApiKey,
    pub base_url: Url,
    /// `None` keeps the HTTP client's default (no explicit timeout)
    pub request_timeout: Option<Duration>,
    pub strict_labels: bool,
}

impl TriageConfig {
    /// Resolve and validate configuration. A missing API key is fatal.
    pub fn load(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let secrets_path = sources
            .secrets_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE));

        let api_key = match sources.api_key.as_deref().and_then(ApiKey::new) {
            Some(key) => {
                debug!("API key taken from flag/environment");
                key
            }
            None => read_secrets_key(&secrets_path)?
                .and_then(ApiKey::new)
                .ok_or_else(|| ConfigError::MissingApiKey {
                    hint: format!(
                        "Set {}, pass --api-key, or add `google_api_key` to {}.",
                        API_KEY_ENV,
                        secrets_path.display()
                    ),
                })?,
        };

        let base_url = parse_base_url(sources.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        Ok(Self {
            api_key,
            base_url,
            request_timeout: sources
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            strict_labels: sources.strict_labels,
        })
    }
}

/// Read `google_api_key` from a secrets file. A missing file yields `None`.
fn read_secrets_key(path: &Path) -> Result<Option<String>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No secrets file");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::SecretsFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let secrets: SecretsFile = toml::from_str(&content).map_err(|source| ConfigError::SecretsParse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), found = secrets.google_api_key.is_some(), "Read secrets file");
    Ok(secrets.google_api_key)
}

/// Parse a base URL and make sure relative joins land under its path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{}: expected an http(s) URL",
            raw
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
