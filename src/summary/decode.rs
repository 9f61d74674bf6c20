//! Layered decoding of model replies.
//!
//! Models do not reliably obey "respond only with valid JSON", so the
//! reply goes through an ordered chain of decoders and the first one
//! that yields actual content wins. The final heuristic layer always
//! succeeds, so decoding as a whole never fails.

use super::{DetailedTimestamp, SummaryResult};
use crate::transcript::TimestampEntry;
use tracing::debug;

/// Narrative length cap for the heuristic layer, ellipsis included.
const MAX_HEURISTIC_NARRATIVE_CHARS: usize = 200;

/// Heuristic key points are capped at this many entries.
const MAX_HEURISTIC_POINTS: usize = 5;

/// Decode a model reply into a summary.
pub fn decode_model_reply(text: &str, timestamps: &[TimestampEntry]) -> SummaryResult {
    if let Some(result) = parse_direct(text) {
        debug!("🧾 Model reply parsed directly as JSON");
        return result;
    }

    if let Some(result) = parse_embedded_object(text) {
        debug!("🧾 Model reply parsed from embedded JSON object");
        return result;
    }

    debug!("🧾 Model reply fell back to heuristic line extraction");
    heuristic_extract(text, timestamps)
}

/// Layer 1: the whole reply is the JSON object.
fn parse_direct(text: &str) -> Option<SummaryResult> {
    serde_json::from_str::<SummaryResult>(text.trim())
        .ok()
        .filter(SummaryResult::has_content)
}

/// Layer 2: the reply wraps a JSON object in prose or a code fence;
/// take the outermost brace-delimited span.
fn parse_embedded_object(text: &str) -> Option<SummaryResult> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<SummaryResult>(&text[start..=end])
        .ok()
        .filter(SummaryResult::has_content)
}

/// Layer 3: treat the reply as plain prose. The leading lines become
/// the narrative, bullet-like lines become key points, and extracted
/// timestamps stand in for the model's section markers.
fn heuristic_extract(text: &str, timestamps: &[TimestampEntry]) -> SummaryResult {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let narrative = lines
        .iter()
        .filter(|line| bullet_text(line).is_none())
        .take(3)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let key_points: Vec<String> = lines
        .iter()
        .filter_map(|line| bullet_text(line))
        .take(MAX_HEURISTIC_POINTS)
        .map(str::to_string)
        .collect();

    let key_points = if key_points.is_empty() {
        vec!["Content analysis available".to_string()]
    } else {
        key_points
    };

    SummaryResult {
        summary: clip_chars(&narrative, MAX_HEURISTIC_NARRATIVE_CHARS),
        key_points,
        topics: vec!["Video content".to_string()],
        video_structure: "Content analyzed from transcript".to_string(),
        key_takeaways: vec!["See summary for details".to_string()],
        detailed_timestamps: timestamps.iter().map(marker_from_entry).collect(),
    }
}

pub(crate) fn marker_from_entry(entry: &TimestampEntry) -> DetailedTimestamp {
    DetailedTimestamp {
        time: entry.display_time.clone(),
        title: entry.text.chars().take(50).collect(),
        description: entry.text.clone(),
    }
}

/// The text of a bullet/numeral/dash line, or None for prose.
fn bullet_text(line: &str) -> Option<&str> {
    for marker in ["-", "*", "•"] {
        if let Some(rest) = line.strip_prefix(marker) {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return Some(rest);
            }
        }
    }

    // Numbered list: digits, then '.' or ')', then the point.
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return Some(rest);
            }
        }
    }

    None
}

fn clip_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max - 3).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TimestampExtractor;

    const WELL_FORMED: &str = r#"{
        "summary": "A walkthrough of the borrow checker.",
        "keyPoints": ["Ownership", "Borrowing"],
        "topics": ["Rust"],
        "videoStructure": "Intro, demos, recap",
        "keyTakeaways": ["Lifetimes are inferred"],
        "detailedTimestamps": [{"time": "0:00", "title": "Intro", "description": "Setup"}]
    }"#;

    #[test]
    fn test_direct_json_reply() {
        let result = decode_model_reply(WELL_FORMED, &[]);
        assert_eq!(result.summary, "A walkthrough of the borrow checker.");
        assert_eq!(result.key_points, vec!["Ownership", "Borrowing"]);
        assert_eq!(result.detailed_timestamps[0].time, "0:00");
    }

    #[test]
    fn test_fenced_json_reply() {
        let fenced = format!("Here is the analysis:\n```json\n{}\n```\nHope that helps!", WELL_FORMED);
        let result = decode_model_reply(&fenced, &[]);
        assert_eq!(result.summary, "A walkthrough of the borrow checker.");
        assert_eq!(result.topics, vec!["Rust"]);
    }

    #[test]
    fn test_empty_json_object_is_not_content() {
        // `{}` parses but carries nothing, so the heuristic layer runs.
        let result = decode_model_reply("{}", &[]);
        assert_eq!(result.key_points, vec!["Content analysis available"]);
        assert_eq!(result.topics, vec!["Video content"]);
    }

    #[test]
    fn test_prose_reply_uses_heuristics() {
        let prose = "\
The video explains how the borrow checker enforces aliasing rules.
It walks through three worked examples.

- Ownership moves by default
- Shared references are read-only
* Mutable references are exclusive
1. Lifetimes connect inputs to outputs
2) Most annotations are inferred
3. Sixth point never makes the cut";

        let result = decode_model_reply(prose, &[]);

        assert!(result.summary.starts_with("The video explains"));
        assert_eq!(result.key_points.len(), 5);
        assert_eq!(result.key_points[0], "Ownership moves by default");
        assert_eq!(result.key_points[2], "Mutable references are exclusive");
        assert_eq!(result.key_points[3], "Lifetimes connect inputs to outputs");
        assert_eq!(result.video_structure, "Content analyzed from transcript");
    }

    #[test]
    fn test_prose_without_bullets_gets_placeholder_points() {
        let result = decode_model_reply("Just one plain line about the video.", &[]);
        assert_eq!(result.summary, "Just one plain line about the video.");
        assert_eq!(result.key_points, vec!["Content analysis available"]);
        assert_eq!(result.key_takeaways, vec!["See summary for details"]);
    }

    #[test]
    fn test_long_prose_narrative_is_clipped() {
        let line = "word ".repeat(100);
        let result = decode_model_reply(&line, &[]);
        assert_eq!(result.summary.chars().count(), 200);
        assert!(result.summary.ends_with("..."));
    }

    #[test]
    fn test_heuristic_carries_extracted_timestamps() {
        let extractor = TimestampExtractor::new(30, 10).unwrap();
        let entries = extractor.extract("[1:05] intro to the topic of testing");

        let result = decode_model_reply("no json here, just words", &entries);

        assert_eq!(result.detailed_timestamps.len(), 1);
        assert_eq!(result.detailed_timestamps[0].time, "1:05");
        assert_eq!(result.detailed_timestamps[0].description, "intro to the topic of testing");
    }

    #[test]
    fn test_garbage_braces_fall_through() {
        let result = decode_model_reply("weird { not json } trailer", &[]);
        assert_eq!(result.key_points, vec!["Content analysis available"]);
        assert!(result.summary.contains("weird"));
    }
}
