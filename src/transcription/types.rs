// src/transcription/types.rs
// Transcription types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One recognized unit of speech on the provider timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedToken {
    /// Offset from the start of the recording, in seconds.
    pub start: f64,
    pub end: f64,
    /// Diarization label; `None` when diarization was off or unavailable.
    pub speaker: Option<u32>,
    pub text: String,
}

/// Which provider payload shape a timeline was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineShape {
    /// Speaker-turn utterances (preferred when present).
    Utterances,
    /// Flat per-word list from the first channel alternative.
    Words,
    /// Neither shape present; only the flat transcript text survived.
    TranscriptOnly,
}

/// Normalized transcript timeline.
///
/// Resolved exactly once at the provider boundary so downstream code never
/// sees the raw utterances-vs-words shape variance. Tokens are stably sorted
/// by `start`; providers are not trusted to deliver them in order.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub tokens: Vec<TimedToken>,
    /// Flat transcript text, used for persistence and the no-token fallback.
    pub transcript: String,
    /// Total duration reported by the provider, in seconds.
    pub duration_secs: f64,
    pub shape: TimelineShape,
}

/// Audio input for a single pipeline run.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Uploaded file bytes with their MIME type.
    File { bytes: Vec<u8>, mime_type: String },
    /// Remote URL the provider fetches directly.
    RemoteUrl(String),
}

impl AudioSource {
    /// True when the source carries nothing the provider could transcribe.
    pub fn is_empty(&self) -> bool {
        match self {
            AudioSource::File { bytes, .. } => bytes.is_empty(),
            AudioSource::RemoteUrl(url) => url.trim().is_empty(),
        }
    }
}

/// Options forwarded to the transcription provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionOptions {
    pub punctuate: bool,
    pub diarize: bool,
    pub language: String,
    pub model: String,
    pub smart_format: bool,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            punctuate: true,
            diarize: false,
            language: "en".to_string(),
            model: "general".to_string(),
            smart_format: true,
        }
    }
}

/// Raw provider response plus its normalized timeline.
#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    /// Verbatim provider JSON, passed through in the pipeline response.
    pub raw: serde_json::Value,
    pub timeline: Timeline,
}

/// Transcription error types.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    TimeoutError,

    #[error("Authentication failed")]
    AuthenticationError,

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Empty audio payload")]
    EmptyAudio,

    #[error("Provider error: {0}")]
    ProviderError(String),
}
