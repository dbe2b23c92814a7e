//! Gemini `generateContent` client.
//!
//! Sends one text prompt per call to the Google Generative Language REST API
//! and returns the text of the first candidate. No retries: quota (429) and
//! every other non-2xx status come back as [`ClassificationError::Api`].

use crate::config::{ApiKey, TriageConfig};
use crate::error::{ClassificationError, ConfigError, Result};
use crate::generator::TextGenerator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Fixed model identifier
pub const GEMINI_MODEL: &str = "gemini-pro-latest";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: ApiKey,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GeminiClient {
    /// Create a client from validated configuration.
    pub fn new(config: &TriageConfig) -> std::result::Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.base_url, GEMINI_MODEL)?,
            api_key: config.api_key.clone(),
        })
    }

    /// Full `generateContent` URL this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(
            model = GEMINI_MODEL,
            prompt_chars = prompt.chars().count(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body);
            warn!(status = status.as_u16(), message = %message, "Gemini API rejected request");
            return Err(ClassificationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ClassificationError::Api {
                status: status.as_u16(),
                message: format!("Unexpected response body: {}", e),
            })?;

        extract_text(parsed)
    }

    fn model_name(&self) -> &str {
        GEMINI_MODEL
    }
}

/// Build `{base}v1beta/models/{model}:generateContent`.
fn endpoint_url(base: &Url, model: &str) -> std::result::Result<Url, ConfigError> {
    base.join(&format!("v1beta/models/{}:generateContent", model))
        .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", base, e)))
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ClassificationError::EmptyResponse(match block_reason {
            Some(reason) => format!("prompt blocked ({})", reason),
            None => "no candidates returned".to_string(),
        }));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ClassificationError::EmptyResponse(match candidate.finish_reason {
            Some(reason) => format!("no text in candidate (finish reason: {})", reason),
            None => "no text in candidate".to_string(),
        }));
    }

    Ok(text)
}

/// Pull `error.message` out of an API error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "<empty body>".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
