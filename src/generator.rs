// Text generation trait: the seam between the classifier and a model backend.
//
// The production implementation is the Gemini REST client. Tests plug in
// in-memory stubs so the parsing contract can be exercised without a network.

use crate::error::Result;
use async_trait::async_trait;

/// Single-shot text generation. Implementations must be async because
/// the real backends are HTTP APIs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the model's full text response.
    ///
    /// Exactly one outbound request per call: no streaming, no retry.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model behind this generator (for logs and /health).
    fn model_name(&self) -> &str;
}
