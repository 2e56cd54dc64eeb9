// src/pipeline/mod.rs
// Pipeline orchestrator: validate -> transcribe -> segment -> summarize ->
// aggregate -> persist, with one top-level failure boundary per run.

mod response;

pub use response::{PipelineResponse, ResponseMetadata, RunOutput};

use crate::config::{self, PipelineConfig, TranscriptionOverrides};
use crate::segmenter;
use crate::store::{CompletedFields, ResultStore, StoreError};
use crate::summarizer::{LlmError, Summarizer};
use crate::timefmt::seconds_to_hms;
use crate::transcription::{AudioSource, TranscriptionError, TranscriptionProvider};

/// Where a run's record lands.
#[derive(Debug, Clone)]
pub enum PersistenceTarget {
    /// Update an existing pending record.
    Record(String),
    /// Create a new completed record owned by this user.
    Owner { user_id: String, title: String },
    /// Do not persist.
    None,
}

/// Pipeline errors, funneled through the run-level boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Provide an audio file or a remote audio URL")]
    MissingAudio,

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Summarization failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Storage failed: {0}")]
    Store(#[from] StoreError),
}

/// Drives the end-to-end flow for one audio source.
///
/// All collaborators are injected at construction so tests can substitute
/// fakes for the transcription provider, the completion provider behind the
/// summarizer, and the store.
pub struct Orchestrator {
    transcriber: Box<dyn TranscriptionProvider>,
    summarizer: Summarizer,
    store: Box<dyn ResultStore>,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        transcriber: Box<dyn TranscriptionProvider>,
        summarizer: Summarizer,
        store: Box<dyn ResultStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            transcriber,
            summarizer,
            store,
            config,
        }
    }

    pub fn store(&self) -> &dyn ResultStore {
        self.store.as_ref()
    }

    /// Run the full pipeline.
    ///
    /// Input validation fails fast without touching any record; every later
    /// error funnels through one boundary that marks a known pending record
    /// `failed` before propagating.
    pub async fn run(
        &self,
        source: &AudioSource,
        overrides: &TranscriptionOverrides,
        target: &PersistenceTarget,
    ) -> Result<RunOutput, PipelineError> {
        if source.is_empty() {
            return Err(PipelineError::MissingAudio);
        }

        match self.execute(source, overrides, target).await {
            Ok(output) => Ok(output),
            Err(err) => {
                if let PersistenceTarget::Record(id) = target {
                    if let Err(store_err) = self.store.mark_failed(id, &err.to_string()) {
                        tracing::error!(
                            "Could not mark record {} failed: {}",
                            id,
                            store_err
                        );
                    }
                }
                tracing::error!("Pipeline run failed: {}", err);
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        source: &AudioSource,
        overrides: &TranscriptionOverrides,
        target: &PersistenceTarget,
    ) -> Result<RunOutput, PipelineError> {
        let options = config::build_transcription_options(overrides);
        tracing::info!("Transcription options: {:?}", options);

        let outcome = self.transcriber.transcribe(source, &options).await?;

        let chunks = segmenter::chunk_timeline(&outcome.timeline, self.config.window_seconds());
        if chunks.is_empty() {
            tracing::warn!("No chunks created; returning raw transcript only");
            return Ok(RunOutput::NoChunks {
                transcript: outcome.raw,
                message: "No chunks created".to_string(),
            });
        }

        let mut chunk_summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            // Sequential on purpose: one in-flight completion per run keeps
            // us inside the provider's per-key rate limit.
            let mut summary = self.summarizer.summarize_chunk(&chunk.text, chunk.index).await?;
            summary.start = seconds_to_hms(chunk.start);
            summary.end = seconds_to_hms(chunk.end);
            summary.transcript_text = chunk.text.clone();
            tracing::info!(
                "Summarized chunk {} ({} - {})",
                chunk.index,
                summary.start,
                summary.end
            );
            chunk_summaries.push(summary);
        }

        let final_summary = self.summarizer.aggregate(&chunk_summaries).await?;

        let mut response = PipelineResponse {
            metadata: ResponseMetadata {
                duration_seconds: outcome.timeline.duration_secs.max(0.0).ceil() as u64,
                chunk_minutes: self.config.chunk_minutes,
                chunks_count: chunks.len(),
                transcription_options: options,
            },
            chunks: chunk_summaries,
            final_summary,
            raw_deepgram_response: outcome.raw,
            id: None,
        };

        response.id = self.persist(target, &response, &outcome.timeline.transcript)?;
        Ok(RunOutput::Summarized(Box::new(response)))
    }

    fn persist(
        &self,
        target: &PersistenceTarget,
        response: &PipelineResponse,
        transcript: &str,
    ) -> Result<Option<String>, PipelineError> {
        let fields = CompletedFields {
            content: serde_json::to_string(&response.chunks).map_err(StoreError::from)?,
            final_summary: response.final_summary.executive_summary.clone(),
            transcript: transcript.to_string(),
        };

        match target {
            PersistenceTarget::Record(id) => match self.store.complete(id, &fields)? {
                Some(record) => Ok(Some(record.id)),
                // Unknown id at completion time: keep returning the caller's
                // id so the response still references the job they hold.
                None => Ok(Some(id.clone())),
            },
            PersistenceTarget::Owner { user_id, title } => {
                let record = self.store.save_completed(user_id, title, &fields)?;
                Ok(Some(record.id))
            }
            PersistenceTarget::None => Ok(None),
        }
    }
}
