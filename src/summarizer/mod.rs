// src/summarizer/mod.rs - Two-stage summarization engine

pub mod llm;
mod prompts;
mod types;

pub use llm::{CompletionProvider, OpenAiAdapter, SamplingParams};
pub use types::{Chapter, ChunkSummary, FinalSummary, LlmError};

/// Chunk text beyond this many characters is truncated before prompting.
/// Truncation, not re-splitting: it bounds request size for pathologically
/// dense windows at the cost of losing their tail.
pub const MAX_CHUNK_PROMPT_CHARS: usize = 20_000;

const CHUNK_FALLBACK_CHARS: usize = 500;
const AGGREGATE_FALLBACK_CHARS: usize = 800;

const CHUNK_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.1,
    max_tokens: 400,
};
const AGGREGATE_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.1,
    max_tokens: 600,
};

/// Summarization engine over an injected completion provider.
pub struct Summarizer {
    llm: Box<dyn CompletionProvider>,
}

impl Summarizer {
    pub fn new(llm: Box<dyn CompletionProvider>) -> Self {
        Self { llm }
    }

    /// Summarize one chunk's text into a structured result.
    ///
    /// Malformed model output never fails: unparseable responses fall back to
    /// a summary built from the raw output. Only a transport-level provider
    /// error propagates.
    pub async fn summarize_chunk(
        &self,
        text: &str,
        index: usize,
    ) -> Result<ChunkSummary, LlmError> {
        let clipped = truncate_chars(text, MAX_CHUNK_PROMPT_CHARS);
        let prompt = prompts::chunk_prompt(clipped);
        let raw = self.llm.complete(&prompt, CHUNK_SAMPLING).await?;

        Ok(match parse_json_payload::<ChunkSummary>(&raw) {
            Some(summary) => summary,
            None => {
                tracing::warn!(
                    "Chunk {}: model output was not valid JSON, using raw-text fallback",
                    index
                );
                ChunkSummary {
                    chunk_index: index,
                    summary: truncate_chars(&raw, CHUNK_FALLBACK_CHARS).to_string(),
                    ..Default::default()
                }
            }
        })
    }

    /// Aggregate all chunk summaries into the final executive summary.
    pub async fn aggregate(&self, summaries: &[ChunkSummary]) -> Result<FinalSummary, LlmError> {
        let combined = summaries
            .iter()
            .map(|c| format!("Chunk {}: {}", c.chunk_index, c.summary))
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = prompts::aggregate_prompt(&combined);
        let raw = self.llm.complete(&prompt, AGGREGATE_SAMPLING).await?;

        Ok(match parse_json_payload::<FinalSummary>(&raw) {
            Some(summary) => summary,
            None => {
                tracing::warn!("Aggregate: model output was not valid JSON, using fallback");
                FinalSummary {
                    executive_summary: truncate_chars(&combined, AGGREGATE_FALLBACK_CHARS)
                        .to_string(),
                    ..Default::default()
                }
            }
        })
    }
}

/// Extract a JSON object from model output that may carry commentary before
/// the payload: parse from the first `{` onward, or fail to `None`.
fn parse_json_payload<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    let payload = match raw.find('{') {
        Some(pos) => &raw[pos..],
        None => raw,
    };
    serde_json::from_str(payload).ok()
}

/// Truncate on a character boundary, never mid-codepoint.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
