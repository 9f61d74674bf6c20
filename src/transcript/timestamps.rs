use crate::error::Result;
use crate::video::format_offset_label;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shortest snippet worth keeping alongside a timestamp marker.
const MIN_SNIPPET_CHARS: usize = 10;

/// Longest snippet carried into a summary, ellipsis included.
const MAX_SNIPPET_CHARS: usize = 100;

/// One timestamped moment pulled out of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampEntry {
    /// Offset from the start of the video, in seconds.
    pub time: u32,

    /// Display label in M:SS form.
    pub display_time: String,

    /// Transcript text following the marker.
    pub text: String,
}

/// Finds timestamp markers in transcript text and thins them out so the
/// summary is not wall-to-wall timestamps.
pub struct TimestampExtractor {
    threshold_seconds: u32,
    max_count: usize,
    marker: Regex,
    leading_marker: Regex,
}

impl TimestampExtractor {
    pub fn new(threshold_seconds: u32, max_count: usize) -> Result<Self> {
        Ok(Self {
            threshold_seconds,
            max_count,
            marker: Regex::new(r"\[?(\d{1,2}):(\d{2})\]?")?,
            leading_marker: Regex::new(r"^\[?\d{1,2}:\d{2}\]?\s*")?,
        })
    }

    /// Extract timestamp entries from transcript text.
    ///
    /// Lines are scanned for M:SS or MM:SS markers, optionally in square
    /// brackets. The first marker per line wins. Entries come back sorted
    /// by offset, at least `threshold_seconds` apart, capped at
    /// `max_count`. Never fails: unusable input yields an empty list.
    pub fn extract(&self, transcript: &str) -> Vec<TimestampEntry> {
        let mut entries = Vec::new();

        for line in transcript.lines() {
            let caps = match self.marker.captures(line) {
                Some(caps) => caps,
                None => continue,
            };

            let minutes: u32 = match caps[1].parse() {
                Ok(m) => m,
                Err(_) => continue,
            };
            let seconds: u32 = match caps[2].parse() {
                Ok(s) => s,
                Err(_) => continue,
            };
            let time = minutes * 60 + seconds;

            // Only a marker that starts the line is stripped from the
            // snippet; a mid-line marker leaves the line intact.
            let snippet = self.leading_marker.replace(line, "");
            let snippet = snippet.trim();

            if snippet.chars().count() < MIN_SNIPPET_CHARS {
                continue;
            }

            entries.push(TimestampEntry {
                time,
                display_time: format_offset_label(time),
                text: clip_snippet(snippet),
            });
        }

        let raw_count = entries.len();
        entries.sort_by_key(|e| e.time);

        // Thin against the last kept entry so close clusters collapse to
        // their earliest member.
        let mut kept: Vec<TimestampEntry> = Vec::new();
        for entry in entries {
            let spaced = match kept.last() {
                Some(last) => entry.time - last.time >= self.threshold_seconds,
                None => true,
            };
            if spaced {
                kept.push(entry);
            }
        }

        kept.truncate(self.max_count);

        debug!(
            "⏱️ Extracted {} timestamps from {} candidate lines",
            kept.len(),
            raw_count
        );

        kept
    }
}

/// Truncate a snippet to the display limit, char-wise so multi-byte text
/// never splits.
fn clip_snippet(snippet: &str) -> String {
    if snippet.chars().count() <= MAX_SNIPPET_CHARS {
        return snippet.to_string();
    }
    let mut clipped: String = snippet.chars().take(MAX_SNIPPET_CHARS - 3).collect();
    clipped.push_str("...");
    clipped
}
