// src/summarizer/llm/mod.rs - completion provider trait

mod openai;

pub use openai::OpenAiAdapter;

use super::types::LlmError;
use async_trait::async_trait;

/// Sampling parameters for one completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for language-model completion adapters.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate free-form text from a prompt.
    async fn complete(&self, prompt: &str, params: SamplingParams) -> Result<String, LlmError>;

    /// Provider name
    fn name(&self) -> &str;
}
