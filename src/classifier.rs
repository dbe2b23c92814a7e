//! LLM-based triage of biomedical abstracts.
//!
//! One classify call = one prompt, one model request, one parse. The model is
//! asked for `{"label": ..., "reason": ...}`; markdown fences it sometimes adds
//! are stripped before parsing. Failures are returned, never retried.

use crate::error::{ClassificationError, Result};
use crate::generator::TextGenerator;
use crate::labels::Label;
use crate::prompts::build_prompt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Characters of model output kept in parse-failure logs and errors
const PREVIEW_CHARS: usize = 200;

/// A validated abstract, ready to classify.
///
/// Construction fails for empty or whitespace-only text, so callers that go
/// through this type never issue a model request for an empty abstract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    abstract_text: String,
}

impl ClassificationRequest {
    pub fn new(abstract_text: impl Into<String>) -> Result<Self> {
        let abstract_text = abstract_text.into();
        if abstract_text.trim().is_empty() {
            return Err(ClassificationError::EmptyAbstract);
        }
        Ok(Self { abstract_text })
    }

    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }
}

/// Label and rationale returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub reason: String,
}

impl ClassificationResult {
    /// The label as a known [`Label`], or `None` when the model invented one.
    pub fn known_label(&self) -> Option<Label> {
        self.label.parse().ok()
    }
}

/// Abstract classifier over any [`TextGenerator`]
#[derive(Clone)]
pub struct Classifier {
    generator: Arc<dyn TextGenerator>,
    strict_labels: bool,
}

impl Classifier {
    /// Create a permissive classifier: any string label is passed through.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            strict_labels: false,
        }
    }

    /// Reject labels outside the fixed set as a classification error.
    pub fn with_strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Classify one abstract.
    ///
    /// Issues exactly one model request. The abstract is not checked here;
    /// callers validate input with [`ClassificationRequest`] first.
    pub async fn classify(&self, abstract_text: &str) -> Result<ClassificationResult> {
        info!(
            chars = abstract_text.chars().count(),
            model = %self.generator.model_name(),
            "Classifying abstract"
        );

        let prompt = build_prompt(abstract_text);
        debug!(prompt_chars = prompt.chars().count(), "Prompt built");

        let raw = self.generator.generate(&prompt).await?;
        let cleaned = clean_response(&raw);

        let result = match parse_classification(&cleaned) {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    error = %e,
                    content_preview = %preview(&raw),
                    "Model output parse failed"
                );
                return Err(e);
            }
        };

        if self.strict_labels && result.known_label().is_none() {
            warn!(label = %result.label, "Model returned a label outside the fixed set");
            return Err(ClassificationError::UnknownLabel(result.label));
        }

        info!(label = %result.label, "Abstract classified");
        Ok(result)
    }

    /// Classify a validated request.
    pub async fn classify_request(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult> {
        self.classify(request.abstract_text()).await
    }
}

/// Strip surrounding whitespace and markdown code-fence markers.
///
/// Plain substring removal of "```json" and "```", applied after trimming;
/// this is not a markdown parser.
pub fn clean_response(raw: &str) -> String {
    raw.trim().replace("```json", "").replace("```", "")
}

/// Parse cleaned model output into a [`ClassificationResult`].
///
/// `label` and `reason` must be present as strings; other keys are ignored and
/// values are returned unchanged. A `null` or non-string value, or a top-level
/// value that is not an object, is reported as [`ClassificationError::MissingField`].
pub fn parse_classification(cleaned: &str) -> Result<ClassificationResult> {
    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|source| ClassificationError::MalformedResponse {
            source,
            preview: preview(cleaned),
        })?;

    let field = |name: &'static str| -> Result<String> {
        value
            .get(name)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(ClassificationError::MissingField(name))
    };

    Ok(ClassificationResult {
        label: field("label")?,
        reason: field("reason")?,
    })
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
