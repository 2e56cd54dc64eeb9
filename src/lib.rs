//! # recapify - audio recording summarizer
//!
//! Pre-recorded audio → Deepgram transcript → fixed-duration text windows →
//! per-window LLM summaries → executive summary, persisted with a
//! processing/completed/failed job lifecycle.

pub mod config;
pub mod pipeline;
pub mod segmenter;
pub mod store;
pub mod summarizer;
pub mod timefmt;
pub mod transcription;

pub use config::{PipelineConfig, TranscriptionOverrides};
pub use pipeline::{Orchestrator, PersistenceTarget, PipelineError, PipelineResponse, RunOutput};
pub use segmenter::Chunk;
pub use store::{ResultStore, SqliteStore, SummaryRecord};
pub use summarizer::{ChunkSummary, FinalSummary, OpenAiAdapter, Summarizer};
pub use transcription::{AudioSource, DeepgramAdapter, TimedToken, TranscriptionProvider};
