//! Fixed instruction templates for the two summarization stages.

/// Per-chunk summarization prompt. The model is asked for JSON only; callers
/// still tolerate commentary around the payload.
pub fn chunk_prompt(chunk_text: &str) -> String {
    format!(
        r#"You are a concise summarization assistant.

Input: transcript text excerpt from a meeting / podcast.

Produce JSON with keys:
- "chunk_index": integer
- "summary": short paragraph (2-4 sentences) summarizing the excerpt.
- "action_items": array of brief action items (if any)
- "key_points": array of 3-6 bullet points summarizing main topics
- "notable_quotes": array of up to 2 memorable short quotes (if present)

Transcript:
---
{}
---
Return only valid JSON."#,
        chunk_text
    )
}

/// Aggregation prompt over the combined per-chunk summaries.
pub fn aggregate_prompt(combined: &str) -> String {
    format!(
        r#"You are an assistant that consolidates summaries.

Input: multiple short chunk summaries. Produce a final executive summary (3-6 sentences), a short "Chapters" array that lists main topics and approximate time ranges (if inferable), and a consolidated "Action Items" list (deduplicated).

Input:
---
{}
---

Return JSON with keys:
- "executive_summary": string
- "chapters": [{{ "title": "...", "start": "HH:MM:SS", "end": "HH:MM:SS", "notes": "..." }}]
- "action_items": [ ... ]

Return only JSON."#,
        combined
    )
}
