// src/transcription/mod.rs
// Transcription Module - Speech-to-Text Provider Adapters

mod deepgram;
mod types;

pub use deepgram::DeepgramAdapter;
pub use types::{
    AudioSource, TimedToken, Timeline, TimelineShape, TranscriptionError, TranscriptionOptions,
    TranscriptionOutcome,
};

use async_trait::async_trait;

/// Unified transcription provider trait.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe a pre-recorded audio source to a time-aligned timeline.
    async fn transcribe(
        &self,
        source: &AudioSource,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionOutcome, TranscriptionError>;

    /// Get provider name
    fn name(&self) -> &str;
}
