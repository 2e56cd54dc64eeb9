// src/pipeline/response.rs
// Response payload shaping for a pipeline run.

use serde::Serialize;

use crate::summarizer::{ChunkSummary, FinalSummary};
use crate::transcription::TranscriptionOptions;

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    pub duration_seconds: u64,
    pub chunk_minutes: u64,
    pub chunks_count: usize,
    /// The options actually sent to the provider, after normalization.
    pub transcription_options: TranscriptionOptions,
}

/// Successful run payload.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResponse {
    pub metadata: ResponseMetadata,
    pub chunks: Vec<ChunkSummary>,
    pub final_summary: FinalSummary,
    /// Verbatim provider response, passed through for display/audit.
    pub raw_deepgram_response: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// What a run produces: either the full summarized payload, or the raw
/// transcript when segmentation produced nothing to summarize.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RunOutput {
    Summarized(Box<PipelineResponse>),
    NoChunks {
        transcript: serde_json::Value,
        message: String,
    },
}
