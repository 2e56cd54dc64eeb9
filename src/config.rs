// src/config.rs
// Pipeline configuration and transcription option normalization.

use serde::Deserialize;

use crate::transcription::TranscriptionOptions;

pub const DEFAULT_CHUNK_MINUTES: u64 = 7;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const CHUNK_MINUTES_ENV: &str = "RECAP_CHUNK_MINUTES";

/// Model forced when the caller asks for Vietnamese; the general model does
/// not cover it.
const VIETNAMESE_MODEL: &str = "nova-3";

/// Language codes accepted from callers. Anything else silently falls back
/// to the default instead of failing the request.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "en-us", "en-gb", "en-au", "en-in",
    "es", "es-es", "es-419",
    "fr", "fr-fr", "fr-ca",
    "de",
    "it",
    "pt", "pt-br", "pt-pt",
    "nl",
    "ja",
    "ko",
    "zh", "zh-cn", "zh-tw",
    "ru",
    "hi",
    "ar",
    "vi",
];

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Width of each summarization window, in minutes.
    pub chunk_minutes: u64,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let chunk_minutes = std::env::var(CHUNK_MINUTES_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_CHUNK_MINUTES);
        Self { chunk_minutes }
    }

    pub fn window_seconds(&self) -> f64 {
        (self.chunk_minutes * 60) as f64
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_minutes: DEFAULT_CHUNK_MINUTES,
        }
    }
}

/// Caller-supplied overrides for the default transcription options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranscriptionOverrides {
    pub diarize: Option<bool>,
    pub language: Option<String>,
    pub model: Option<String>,
    pub smart_format: Option<bool>,
}

/// Merge caller overrides onto the default transcription options.
///
/// Unrecognized language codes are ignored in favor of the default; `vi`
/// forces the alternate model regardless of any explicit model override.
pub fn build_transcription_options(overrides: &TranscriptionOverrides) -> TranscriptionOptions {
    let mut options = TranscriptionOptions::default();

    if let Some(diarize) = overrides.diarize {
        options.diarize = diarize;
    }

    if let Some(model) = overrides.model.as_deref() {
        let trimmed = model.trim();
        if !trimmed.is_empty() {
            options.model = trimmed.to_string();
        }
    }

    if let Some(language) = overrides.language.as_deref() {
        options.language = normalize_language(language);
        if options.language == "vi" {
            options.model = VIETNAMESE_MODEL.to_string();
        }
    }

    if let Some(smart_format) = overrides.smart_format {
        options.smart_format = smart_format;
    }

    options
}

pub fn normalize_language(input: &str) -> String {
    let lang = input.trim().to_lowercase();
    if SUPPORTED_LANGUAGES.contains(&lang.as_str()) {
        lang
    } else {
        tracing::warn!("Unsupported language: {}, falling back to '{}'", lang, DEFAULT_LANGUAGE);
        DEFAULT_LANGUAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_no_overrides() {
        let options = build_transcription_options(&TranscriptionOverrides::default());
        assert!(options.punctuate);
        assert!(!options.diarize);
        assert_eq!(options.language, "en");
        assert_eq!(options.model, "general");
        assert!(options.smart_format);
    }

    #[test]
    fn test_unsupported_language_falls_back() {
        let overrides = TranscriptionOverrides {
            language: Some("tlh".to_string()),
            ..Default::default()
        };
        let options = build_transcription_options(&overrides);
        assert_eq!(options.language, "en");
    }

    #[test]
    fn test_language_is_case_insensitive() {
        let overrides = TranscriptionOverrides {
            language: Some("PT-BR".to_string()),
            ..Default::default()
        };
        let options = build_transcription_options(&overrides);
        assert_eq!(options.language, "pt-br");
    }

    #[test]
    fn test_vietnamese_forces_alternate_model() {
        let overrides = TranscriptionOverrides {
            language: Some("vi".to_string()),
            model: Some("general".to_string()),
            ..Default::default()
        };
        let options = build_transcription_options(&overrides);
        assert_eq!(options.language, "vi");
        assert_eq!(options.model, "nova-3");
    }

    #[test]
    fn test_explicit_overrides_applied() {
        let overrides = TranscriptionOverrides {
            diarize: Some(true),
            smart_format: Some(false),
            model: Some("nova-2".to_string()),
            language: None,
        };
        let options = build_transcription_options(&overrides);
        assert!(options.diarize);
        assert!(!options.smart_format);
        assert_eq!(options.model, "nova-2");
    }

    #[test]
    fn test_default_config_window() {
        let config = PipelineConfig::default();
        assert_eq!(config.window_seconds(), 420.0);
    }
}
