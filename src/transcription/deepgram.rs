// src/transcription/deepgram.rs
// Deepgram Pre-Recorded STT Adapter

use super::{
    AudioSource, TimedToken, Timeline, TimelineShape, TranscriptionError, TranscriptionOptions,
    TranscriptionOutcome, TranscriptionProvider,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::cmp::Ordering;
use std::time::Duration;

const DEEPGRAM_API_URL: &str = "https://api.deepgram.com/v1/listen";
const TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Default, Deserialize)]
struct DeepgramResponse {
    #[serde(default)]
    metadata: DeepgramMetadata,
    #[serde(default)]
    results: DeepgramResults,
}

#[derive(Debug, Default, Deserialize)]
struct DeepgramMetadata {
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Default, Deserialize)]
struct DeepgramResults {
    #[serde(default)]
    utterances: Option<Vec<DeepgramUtterance>>,
    #[serde(default)]
    channels: Vec<DeepgramChannel>,
}

#[derive(Debug, Deserialize)]
struct DeepgramUtterance {
    start: f64,
    end: f64,
    #[serde(default)]
    speaker: Option<u32>,
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Default, Deserialize)]
struct DeepgramChannel {
    #[serde(default)]
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(Debug, Default, Deserialize)]
struct DeepgramAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    words: Vec<DeepgramWord>,
}

#[derive(Debug, Deserialize)]
struct DeepgramWord {
    start: f64,
    end: f64,
    #[serde(default)]
    speaker: Option<u32>,
    #[serde(default)]
    word: String,
}

pub struct DeepgramAdapter {
    api_key: String,
    client: reqwest::Client,
}

impl DeepgramAdapter {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        tracing::info!("Deepgram adapter initialized");

        Self { api_key, client }
    }

    /// Build from `DEEPGRAM_API_KEY`, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var("DEEPGRAM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(Self::new)
    }

    fn query_params(options: &TranscriptionOptions) -> Vec<(&'static str, String)> {
        vec![
            ("punctuate", options.punctuate.to_string()),
            ("diarize", options.diarize.to_string()),
            ("language", options.language.clone()),
            ("model", options.model.clone()),
            ("smart_format", options.smart_format.to_string()),
        ]
    }

    /// Resolve the utterances-vs-words shape variance into one timeline.
    ///
    /// Utterances win when present; otherwise the first channel's first
    /// alternative word list is used. Tokens are stably sorted by `start` so
    /// out-of-order provider output cannot misassign them to windows.
    fn normalize(raw: &serde_json::Value) -> Timeline {
        let parsed: DeepgramResponse =
            serde_json::from_value(raw.clone()).unwrap_or_default();

        let (mut tokens, shape) = match parsed.results.utterances {
            Some(utterances) if !utterances.is_empty() => {
                let tokens = utterances
                    .iter()
                    .filter(|u| !u.transcript.trim().is_empty())
                    .map(|u| TimedToken {
                        start: u.start,
                        end: u.end,
                        speaker: u.speaker,
                        text: u.transcript.trim().to_string(),
                    })
                    .collect::<Vec<_>>();
                (tokens, TimelineShape::Utterances)
            }
            _ => {
                let words = parsed
                    .results
                    .channels
                    .first()
                    .and_then(|ch| ch.alternatives.first())
                    .map(|alt| alt.words.as_slice())
                    .unwrap_or(&[]);
                let tokens = words
                    .iter()
                    .filter(|w| !w.word.trim().is_empty())
                    .map(|w| TimedToken {
                        start: w.start,
                        end: w.end,
                        speaker: w.speaker,
                        text: w.word.trim().to_string(),
                    })
                    .collect::<Vec<_>>();
                let shape = if tokens.is_empty() {
                    TimelineShape::TranscriptOnly
                } else {
                    TimelineShape::Words
                };
                (tokens, shape)
            }
        };

        tokens.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

        let transcript = parsed
            .results
            .channels
            .first()
            .and_then(|ch| ch.alternatives.first())
            .map(|alt| alt.transcript.clone())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| {
                tokens
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            });

        Timeline {
            tokens,
            transcript,
            duration_secs: parsed.metadata.duration,
            shape,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for DeepgramAdapter {
    async fn transcribe(
        &self,
        source: &AudioSource,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionOutcome, TranscriptionError> {
        if source.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        let request = self
            .client
            .post(DEEPGRAM_API_URL)
            .query(&Self::query_params(options))
            .header("Authorization", format!("Token {}", self.api_key));

        let request = match source {
            AudioSource::RemoteUrl(url) => {
                tracing::info!("Deepgram: requesting provider fetch of {}", url);
                request.json(&json!({ "url": url }))
            }
            AudioSource::File { bytes, mime_type } => {
                tracing::info!(
                    "Deepgram: uploading {} bytes ({})",
                    bytes.len(),
                    mime_type
                );
                request
                    .header("Content-Type", mime_type.clone())
                    .body(bytes.clone())
            }
        };

        let response = request.send().await;

        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    let raw: serde_json::Value = resp
                        .json()
                        .await
                        .map_err(|e| TranscriptionError::ProviderError(e.to_string()))?;
                    let timeline = Self::normalize(&raw);

                    tracing::info!(
                        "Deepgram success: {} tokens, {:.1}s audio",
                        timeline.tokens.len(),
                        timeline.duration_secs
                    );

                    Ok(TranscriptionOutcome { raw, timeline })
                } else if status.as_u16() == 401 {
                    Err(TranscriptionError::AuthenticationError)
                } else if status.as_u16() == 429 {
                    Err(TranscriptionError::RateLimitError)
                } else {
                    let error_text = resp.text().await.unwrap_or_default();
                    Err(TranscriptionError::ProviderError(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )))
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    Err(TranscriptionError::TimeoutError)
                } else {
                    Err(TranscriptionError::NetworkError(e.to_string()))
                }
            }
        }
    }

    fn name(&self) -> &str {
        "Deepgram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance_payload() -> serde_json::Value {
        json!({
            "metadata": { "duration": 12.5 },
            "results": {
                "utterances": [
                    { "start": 0.0, "end": 2.0, "speaker": 0, "transcript": " Hello there " },
                    { "start": 2.0, "end": 4.0, "speaker": 1, "transcript": "Hi" }
                ],
                "channels": [
                    { "alternatives": [ { "transcript": "Hello there Hi", "words": [] } ] }
                ]
            }
        })
    }

    #[test]
    fn test_normalize_prefers_utterances() {
        let timeline = DeepgramAdapter::normalize(&utterance_payload());
        assert_eq!(timeline.shape, TimelineShape::Utterances);
        assert_eq!(timeline.tokens.len(), 2);
        assert_eq!(timeline.tokens[0].text, "Hello there");
        assert_eq!(timeline.tokens[1].speaker, Some(1));
        assert_eq!(timeline.duration_secs, 12.5);
        assert_eq!(timeline.transcript, "Hello there Hi");
    }

    #[test]
    fn test_normalize_falls_back_to_words() {
        let payload = json!({
            "metadata": { "duration": 3.0 },
            "results": {
                "channels": [
                    { "alternatives": [ {
                        "transcript": "one two",
                        "words": [
                            { "start": 0.0, "end": 1.0, "word": "one" },
                            { "start": 1.0, "end": 2.0, "word": "two" }
                        ]
                    } ] }
                ]
            }
        });
        let timeline = DeepgramAdapter::normalize(&payload);
        assert_eq!(timeline.shape, TimelineShape::Words);
        assert_eq!(timeline.tokens.len(), 2);
        assert_eq!(timeline.tokens[0].speaker, None);
        assert_eq!(timeline.transcript, "one two");
    }

    #[test]
    fn test_normalize_sorts_out_of_order_tokens() {
        let payload = json!({
            "results": {
                "channels": [
                    { "alternatives": [ {
                        "transcript": "b a",
                        "words": [
                            { "start": 5.0, "end": 6.0, "word": "b" },
                            { "start": 1.0, "end": 2.0, "word": "a" }
                        ]
                    } ] }
                ]
            }
        });
        let timeline = DeepgramAdapter::normalize(&payload);
        assert_eq!(timeline.tokens[0].text, "a");
        assert_eq!(timeline.tokens[1].text, "b");
    }

    #[test]
    fn test_normalize_empty_payload() {
        let timeline = DeepgramAdapter::normalize(&json!({}));
        assert_eq!(timeline.shape, TimelineShape::TranscriptOnly);
        assert!(timeline.tokens.is_empty());
        assert!(timeline.transcript.is_empty());
        assert_eq!(timeline.duration_secs, 0.0);
    }

    #[test]
    fn test_normalize_transcript_only_payload() {
        let payload = json!({
            "metadata": { "duration": 30.0 },
            "results": {
                "channels": [
                    { "alternatives": [ { "transcript": "just text", "words": [] } ] }
                ]
            }
        });
        let timeline = DeepgramAdapter::normalize(&payload);
        assert_eq!(timeline.shape, TimelineShape::TranscriptOnly);
        assert!(timeline.tokens.is_empty());
        assert_eq!(timeline.transcript, "just text");
    }

    #[test]
    fn test_query_params_reflect_options() {
        let options = TranscriptionOptions {
            diarize: true,
            language: "vi".to_string(),
            model: "nova-3".to_string(),
            ..Default::default()
        };
        let params = DeepgramAdapter::query_params(&options);
        assert!(params.contains(&("diarize", "true".to_string())));
        assert!(params.contains(&("language", "vi".to_string())));
        assert!(params.contains(&("model", "nova-3".to_string())));
        assert!(params.contains(&("punctuate", "true".to_string())));
        assert!(params.contains(&("smart_format", "true".to_string())));
    }
}
