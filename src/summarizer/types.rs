// src/summarizer/types.rs
// Summarization result types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured result of summarizing one chunk.
///
/// Parsed leniently from model output: every field defaults when missing.
/// `start`, `end` and `transcript_text` are attached by the pipeline after
/// the model call, never requested from the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSummary {
    pub chunk_index: usize,
    pub summary: String,
    pub action_items: Vec<String>,
    pub key_points: Vec<String>,
    pub notable_quotes: Vec<String>,
    /// Window start as `HH:MM:SS`.
    pub start: String,
    /// Window end as `HH:MM:SS`.
    pub end: String,
    /// Raw chunk text, kept for display and audit.
    pub transcript_text: String,
}

/// One inferred chapter in the final summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    pub title: String,
    pub start: String,
    pub end: String,
    pub notes: String,
}

/// Aggregated result over all chunk summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalSummary {
    pub executive_summary: String,
    pub chapters: Vec<Chapter>,
    pub action_items: Vec<String>,
}

/// Completion provider errors.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid response from model")]
    InvalidResponse,

    #[error("Request timeout")]
    Timeout,
}
