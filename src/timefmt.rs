// src/timefmt.rs
// Time label formatting shared by the segmenter and the pipeline.

/// Format a second offset as `HH:MM:SS`, flooring sub-second parts.
pub fn seconds_to_hms(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
