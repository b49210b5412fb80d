use anyhow::Result;
use async_trait::async_trait;

/// Fixed sampling parameters for every fallback completion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.6, top_p: 0.8, top_k: 40, max_output_tokens: 256 }
    }
}

/// One completion attempt's output. Empty text with a `block_reason` means
/// the service refused the prompt; empty text without one means the model
/// simply produced nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub block_reason: Option<String>,
}

/// External completion capability: list usable models, generate text for an
/// ordered list of prompt segments.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifiers that support content generation, in preference
    /// order. An error or empty list makes the dispatcher fall back to its
    /// hard-coded candidate order.
    async fn list_generation_models(&self) -> Result<Vec<String>>;

    async fn generate(
        &self,
        model: &str,
        params: &GenerationParams,
        parts: &[String],
    ) -> Result<Completion>;
}
