// src/segmenter.rs
// Time-window segmenter: timeline tokens -> fixed-duration text chunks.

use serde::Serialize;

use crate::transcription::{TimedToken, Timeline};

/// A fixed-duration window of transcript text.
///
/// Indices are dense over emitted chunks: windows with no tokens are dropped,
/// not emitted blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    pub index: usize,
    /// Window start in seconds.
    pub start: f64,
    /// Window end in seconds; clamped to the total duration for the last chunk.
    pub end: f64,
    pub text: String,
}

/// Partition tokens into fixed windows of `window_seconds`.
///
/// A token belongs to the window its `start` falls in, half-open and
/// left-inclusive, so a token on a boundary never lands in the previous
/// window. Tokens must already be in non-decreasing `start` order; the
/// provider adapter sorts them once at the boundary.
pub fn segment(tokens: &[TimedToken], window_seconds: f64) -> Vec<Chunk> {
    let last_end = match tokens.last() {
        Some(token) => token.end,
        None => return Vec::new(),
    };

    let total_duration = if last_end > 0.0 {
        last_end.ceil()
    } else {
        window_seconds
    };
    let num_windows = (total_duration / window_seconds).ceil() as usize;

    let mut chunks = Vec::new();
    for i in 0..num_windows {
        let window_start = i as f64 * window_seconds;
        let window_end = (i + 1) as f64 * window_seconds;

        let parts: Vec<&TimedToken> = tokens
            .iter()
            .filter(|t| t.start >= window_start && t.start < window_end)
            .collect();
        if parts.is_empty() {
            continue;
        }

        chunks.push(Chunk {
            index: chunks.len(),
            start: window_start,
            end: window_end.min(total_duration),
            text: format_with_speaker_labels(&parts),
        });
    }

    chunks
}

/// Degenerate single chunk covering the whole recording, built from the flat
/// transcript when the provider returned no usable token timeline.
pub fn fallback_chunk(transcript: &str, duration_secs: f64) -> Chunk {
    Chunk {
        index: 0,
        start: 0.0,
        end: duration_secs.max(0.0).ceil(),
        text: transcript.to_string(),
    }
}

/// Segment a normalized timeline, applying the flat-transcript fallback when
/// it carries no tokens. Returns no chunks only when the timeline has neither
/// tokens nor transcript text.
pub fn chunk_timeline(timeline: &Timeline, window_seconds: f64) -> Vec<Chunk> {
    if timeline.tokens.is_empty() {
        if timeline.transcript.trim().is_empty() {
            return Vec::new();
        }
        return vec![fallback_chunk(&timeline.transcript, timeline.duration_secs)];
    }
    segment(&timeline.tokens, window_seconds)
}

/// Render a window's tokens, grouping maximal runs of the same speaker.
///
/// Runs with a speaker get a `[Speaker {id}]:` prefix; runs without one are
/// rendered bare. When no token in the window carries a speaker at all, the
/// words are joined flat with no grouping.
fn format_with_speaker_labels(parts: &[&TimedToken]) -> String {
    let Some(first) = parts.first() else {
        return String::new();
    };

    if parts.iter().all(|p| p.speaker.is_none()) {
        return parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
    }

    let mut groups: Vec<(Option<u32>, Vec<&str>)> = vec![(first.speaker, vec![first.text.as_str()])];
    for part in &parts[1..] {
        let current = groups.last_mut().expect("at least one group");
        if part.speaker == current.0 {
            current.1.push(part.text.as_str());
        } else {
            groups.push((part.speaker, vec![part.text.as_str()]));
        }
    }

    groups
        .iter()
        .map(|(speaker, words)| match speaker {
            Some(id) => format!("[Speaker {}]: {}", id, words.join(" ")),
            None => words.join(" "),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::TimelineShape;

    fn token(start: f64, end: f64, speaker: Option<u32>, text: &str) -> TimedToken {
        TimedToken {
            start,
            end,
            speaker,
            text: text.to_string(),
        }
    }

    fn timeline(tokens: Vec<TimedToken>, transcript: &str, duration: f64) -> Timeline {
        Timeline {
            shape: if tokens.is_empty() {
                TimelineShape::TranscriptOnly
            } else {
                TimelineShape::Words
            },
            tokens,
            transcript: transcript.to_string(),
            duration_secs: duration,
        }
    }

    #[test]
    fn test_single_window_with_speakers() {
        let tokens = vec![
            token(0.0, 2.0, Some(0), "Hello"),
            token(2.0, 4.0, Some(0), "world"),
            token(5.0, 7.0, Some(1), "Hi"),
        ];
        let chunks = segment(&tokens, 10.0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].text, "[Speaker 0]: Hello world\n\n[Speaker 1]: Hi");
    }

    #[test]
    fn test_windows_clamp_and_density() {
        // 900s of audio over 420s windows: 0-420, 420-840, 840-900 (clamped).
        let tokens = vec![
            token(10.0, 11.0, None, "early"),
            token(850.0, 900.0, None, "late"),
        ];
        let chunks = segment(&tokens, 420.0);
        assert_eq!(chunks.len(), 2, "middle window has no tokens and is dropped");
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].start, 0.0);
        assert_eq!(chunks[0].end, 420.0);
        assert_eq!(chunks[1].index, 1, "indices stay dense over emitted chunks");
        assert_eq!(chunks[1].start, 840.0);
        assert_eq!(chunks[1].end, 900.0, "last window end is clamped to duration");
    }

    #[test]
    fn test_boundary_token_belongs_to_later_window() {
        let tokens = vec![
            token(0.0, 1.0, None, "a"),
            token(10.0, 11.0, None, "b"),
        ];
        let chunks = segment(&tokens, 10.0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "a");
        assert_eq!(chunks[1].text, "b");
    }

    #[test]
    fn test_windows_are_non_overlapping_and_increasing() {
        let tokens: Vec<TimedToken> = (0..40)
            .map(|i| token(i as f64 * 30.0, i as f64 * 30.0 + 1.0, None, "w"))
            .collect();
        let chunks = segment(&tokens, 420.0);
        for pair in chunks.windows(2) {
            assert!(pair[0].end <= pair[1].start);
            assert!(pair[0].index < pair[1].index);
        }
        // Every token start falls inside exactly one chunk window.
        for t in &tokens {
            let holders = chunks
                .iter()
                .filter(|c| t.start >= c.start && t.start < c.start + 420.0)
                .count();
            assert_eq!(holders, 1);
        }
    }

    #[test]
    fn test_zero_length_token_is_valid() {
        let tokens = vec![token(3.0, 3.0, None, "blip")];
        let chunks = segment(&tokens, 10.0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "blip");
        // Zero final end falls back to the nominal window width.
        assert_eq!(chunks[0].end, 10.0);
    }

    #[test]
    fn test_mixed_speaker_runs() {
        let tokens = vec![
            token(0.0, 1.0, None, "uh"),
            token(1.0, 2.0, Some(2), "right"),
            token(2.0, 3.0, Some(2), "then"),
            token(3.0, 4.0, None, "okay"),
        ];
        let chunks = segment(&tokens, 60.0);
        assert_eq!(chunks[0].text, "uh\n\n[Speaker 2]: right then\n\nokay");
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let tokens = vec![
            token(0.0, 1.0, Some(0), "a"),
            token(1.0, 2.0, Some(1), "b"),
            token(2.0, 3.0, Some(1), "c"),
        ];
        let first = segment(&tokens, 30.0);
        let second = segment(&tokens, 30.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_tokens_yield_no_chunks() {
        assert!(segment(&[], 420.0).is_empty());
    }

    #[test]
    fn test_timeline_fallback_single_chunk() {
        let tl = timeline(Vec::new(), "flat transcript text", 95.2);
        let chunks = chunk_timeline(&tl, 420.0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].start, 0.0);
        assert_eq!(chunks[0].end, 96.0);
        assert_eq!(chunks[0].text, "flat transcript text");
    }

    #[test]
    fn test_timeline_without_tokens_or_text_yields_nothing() {
        let tl = timeline(Vec::new(), "   ", 10.0);
        assert!(chunk_timeline(&tl, 420.0).is_empty());
    }

    #[test]
    fn test_timeline_with_tokens_uses_segmentation() {
        let tl = timeline(
            vec![token(0.0, 2.0, Some(0), "Hello"), token(5.0, 7.0, Some(1), "Hi")],
            "Hello Hi",
            7.0,
        );
        let chunks = chunk_timeline(&tl, 10.0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "[Speaker 0]: Hello\n\n[Speaker 1]: Hi");
    }
}
