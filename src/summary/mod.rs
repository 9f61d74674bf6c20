pub mod decode;
pub mod generator;

pub use generator::SummaryGenerator;

use serde::{Deserialize, Serialize};

/// Structured summary of a video, either decoded from a model reply or
/// synthesized locally when the model is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryResult {
    /// Narrative summary, a few paragraphs at most.
    pub summary: String,

    pub key_points: Vec<String>,

    pub topics: Vec<String>,

    /// How the video is organized (intro, sections, conclusion).
    pub video_structure: String,

    pub key_takeaways: Vec<String>,

    pub detailed_timestamps: Vec<DetailedTimestamp>,
}

/// A model-authored section marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedTimestamp {
    /// Display label, e.g. "12:34".
    pub time: String,
    pub title: String,
    pub description: String,
}

impl SummaryResult {
    /// A decoded result counts only if it carries some actual content.
    pub fn has_content(&self) -> bool {
        !self.summary.trim().is_empty() || !self.key_points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_camel_case() {
        let result = SummaryResult {
            summary: "s".to_string(),
            key_points: vec!["p".to_string()],
            video_structure: "v".to_string(),
            key_takeaways: vec!["t".to_string()],
            detailed_timestamps: vec![DetailedTimestamp {
                time: "0:00".to_string(),
                title: "Intro".to_string(),
                description: "d".to_string(),
            }],
            ..SummaryResult::default()
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("keyPoints").is_some());
        assert!(json.get("videoStructure").is_some());
        assert!(json.get("keyTakeaways").is_some());
        assert!(json.get("detailedTimestamps").is_some());
        assert_eq!(json["detailedTimestamps"][0]["time"], "0:00");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let result: SummaryResult =
            serde_json::from_str(r#"{"summary": "just a narrative"}"#).unwrap();
        assert_eq!(result.summary, "just a narrative");
        assert!(result.key_points.is_empty());
        assert!(result.has_content());

        let empty: SummaryResult = serde_json::from_str("{}").unwrap();
        assert!(!empty.has_content());
    }
}
