use super::decode::{decode_model_reply, marker_from_entry};
use super::SummaryResult;
use crate::llm::TextModel;
use crate::transcript::TimestampEntry;
use crate::video::VideoContext;
use tracing::{debug, info, warn};

/// JSON shape the model is asked to produce.
const RESPONSE_SCHEMA: &str = r#"{
  "summary": "A comprehensive 2-3 paragraph summary of the main content and key points discussed in the video",
  "keyPoints": ["Point 1", "Point 2", "Point 3", "Point 4", "Point 5"],
  "topics": ["Topic 1", "Topic 2", "Topic 3"],
  "videoStructure": "Overview of how the video is organized (introduction, main sections, conclusion)",
  "keyTakeaways": ["Takeaway 1", "Takeaway 2", "Takeaway 3"],
  "detailedTimestamps": [
    {
      "time": "00:00",
      "title": "Introduction",
      "description": "What happens in this section"
    }
  ]
}"#;

const GUIDELINES: &str = "IMPORTANT GUIDELINES:
1. Base your analysis on the actual transcript/content provided, not just the title
2. If transcript is short or unavailable, use the description and other available information
3. Extract meaningful timestamps that highlight key moments
4. Focus on the actual content discussed, not just metadata
5. Provide actionable insights and key learnings
6. Structure the response in a way that helps viewers understand the video efficiently

Respond only with valid JSON.";

/// Turns resolved context into a structured summary via the configured
/// model, degrading to a locally built summary when the model cannot
/// be reached. Generation never fails.
pub struct SummaryGenerator {
    model: Option<Box<dyn TextModel>>,
    transcript_char_budget: usize,
}

impl SummaryGenerator {
    /// `model` is None when no usable model credential exists; every
    /// request then takes the local fallback path.
    pub fn new(model: Option<Box<dyn TextModel>>, transcript_char_budget: usize) -> Self {
        Self {
            model,
            transcript_char_budget,
        }
    }

    pub async fn generate(
        &self,
        video: &VideoContext,
        transcript: &str,
        timestamps: &[TimestampEntry],
    ) -> SummaryResult {
        let model = match self.model.as_ref() {
            Some(model) => model,
            None => {
                warn!("🚫 No model configured, using local fallback summary");
                return local_fallback_summary(video, timestamps);
            }
        };

        let prompt = build_prompt(video, transcript, timestamps, self.transcript_char_budget);
        info!("🤖 Requesting summary from {:?}", model.provider());

        match model.generate(&prompt).await {
            Ok(reply) => {
                debug!(
                    "Model replied with {} chars (tokens: {:?})",
                    reply.text.chars().count(),
                    reply.tokens_used
                );
                decode_model_reply(&reply.text, timestamps)
            }
            Err(e) => {
                warn!("❌ Model request failed: {}, using local fallback summary", e);
                local_fallback_summary(video, timestamps)
            }
        }
    }
}

/// Deterministic prompt assembly. The transcript is clipped to the
/// configured budget so request size stays bounded.
pub(crate) fn build_prompt(
    video: &VideoContext,
    transcript: &str,
    timestamps: &[TimestampEntry],
    transcript_char_budget: usize,
) -> String {
    let duration = if video.duration.is_empty() {
        "Unknown"
    } else {
        video.duration.as_str()
    };

    let timestamp_lines = timestamps
        .iter()
        .map(|t| format!("{} - {}", t.time, t.text))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = format!(
        "You are an expert video analyst. Analyze this YouTube video and provide a comprehensive summary.\n\n\
        VIDEO INFORMATION:\n\
        Title: {}\n\
        Channel: {}\n\
        Duration: {}\n\
        URL: {}\n\n\
        VIDEO TRANSCRIPT/CONTENT:\n{}\n\n\
        AVAILABLE TIMESTAMPS:\n{}\n\n\
        Please provide a detailed analysis in the following JSON format:\n\n",
        video.title,
        video.channel_name,
        duration,
        video.watch_url(),
        clip_transcript(transcript, transcript_char_budget),
        timestamp_lines
    );
    prompt.push_str(RESPONSE_SCHEMA);
    prompt.push_str("\n\n");
    prompt.push_str(GUIDELINES);
    prompt
}

fn clip_transcript(transcript: &str, budget: usize) -> String {
    if transcript.chars().count() <= budget {
        return transcript.to_string();
    }
    let mut clipped: String = transcript.chars().take(budget).collect();
    clipped.push_str("...");
    clipped
}

/// Summary built purely from local metadata, for when the model call
/// itself fails. Extracted timestamps stand in for the model's section
/// markers. Always renderable.
pub(crate) fn local_fallback_summary(
    video: &VideoContext,
    timestamps: &[TimestampEntry],
) -> SummaryResult {
    let title = if video.title.is_empty() {
        "this video"
    } else {
        video.title.as_str()
    };
    let channel = if video.channel_name.is_empty() {
        "an unknown channel"
    } else {
        video.channel_name.as_str()
    };
    let duration = if video.duration.is_empty() {
        "unknown"
    } else {
        video.duration.as_str()
    };

    SummaryResult {
        summary: format!(
            "The language model could not be reached, so this is a local overview. \
            \"{}\" is a video from {} (duration: {}). Retry once model access is \
            available for a full AI-generated analysis.",
            title, channel, duration
        ),
        key_points: vec![
            "AI summary unavailable for this request".to_string(),
            "Video metadata was used instead of the transcript".to_string(),
            "Retry to attempt a full analysis".to_string(),
        ],
        topics: vec!["General".to_string()],
        video_structure: "Not analyzed".to_string(),
        key_takeaways: vec!["Retry for a full AI analysis".to_string()],
        detailed_timestamps: timestamps.iter().map(marker_from_entry).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SummarizerError};
    use crate::llm::{ModelProvider, ModelReply};
    use crate::transcript::TimestampExtractor;
    use async_trait::async_trait;

    struct CannedModel {
        reply: Option<String>,
    }

    #[async_trait]
    impl TextModel for CannedModel {
        async fn generate(&self, _prompt: &str) -> Result<ModelReply> {
            match &self.reply {
                Some(text) => Ok(ModelReply {
                    text: text.clone(),
                    tokens_used: Some(42),
                }),
                None => Err(SummarizerError::EmptyModelResponse),
            }
        }

        fn provider(&self) -> ModelProvider {
            ModelProvider::Gemini
        }
    }

    fn video() -> VideoContext {
        VideoContext {
            id: "abc123def45".to_string(),
            title: "Borrow Checker Explained".to_string(),
            channel_name: "Systems Weekly".to_string(),
            duration: "12:34".to_string(),
            ..VideoContext::default()
        }
    }

    #[test]
    fn test_prompt_embeds_context_and_schema() {
        let extractor = TimestampExtractor::new(30, 10).unwrap();
        let timestamps = extractor.extract("[1:05] intro to the topic of testing");

        let prompt = build_prompt(&video(), "the transcript body", &timestamps, 4000);

        assert!(prompt.contains("Title: Borrow Checker Explained"));
        assert!(prompt.contains("Channel: Systems Weekly"));
        assert!(prompt.contains("Duration: 12:34"));
        assert!(prompt.contains("URL: https://www.youtube.com/watch?v=abc123def45"));
        assert!(prompt.contains("the transcript body"));
        assert!(prompt.contains("65 - intro to the topic of testing"));
        assert!(prompt.contains("\"detailedTimestamps\""));
        assert!(prompt.ends_with("Respond only with valid JSON."));
    }

    #[test]
    fn test_prompt_clips_transcript_to_budget() {
        let transcript = "x".repeat(10_000);
        let prompt = build_prompt(&video(), &transcript, &[], 4000);

        assert!(prompt.contains(&"x".repeat(4000)));
        assert!(!prompt.contains(&"x".repeat(4001)));
    }

    #[tokio::test]
    async fn test_failing_model_yields_local_fallback() {
        let generator = SummaryGenerator::new(Some(Box::new(CannedModel { reply: None })), 4000);
        let extractor = TimestampExtractor::new(30, 10).unwrap();
        let timestamps = extractor.extract("[1:05] intro to the topic of testing");

        let result = generator.generate(&video(), "transcript", &timestamps).await;

        assert!(result.summary.contains("Borrow Checker Explained"));
        assert!(!result.key_points.is_empty());
        assert_eq!(result.topics, vec!["General"]);
        // Extracted timestamps still reach the payload without a model.
        assert_eq!(result.detailed_timestamps.len(), 1);
        assert_eq!(result.detailed_timestamps[0].time, "1:05");
    }

    #[tokio::test]
    async fn test_missing_model_yields_local_fallback() {
        let generator = SummaryGenerator::new(None, 4000);

        let result = generator.generate(&video(), "transcript", &[]).await;

        assert!(result.summary.contains("Borrow Checker Explained"));
        assert_eq!(result.topics, vec!["General"]);
    }

    #[tokio::test]
    async fn test_json_reply_is_decoded() {
        let reply = r#"{"summary": "Tight walkthrough.", "keyPoints": ["a"], "topics": ["Rust"]}"#;
        let generator = SummaryGenerator::new(
            Some(Box::new(CannedModel {
                reply: Some(reply.to_string()),
            })),
            4000,
        );

        let result = generator.generate(&video(), "transcript", &[]).await;

        assert_eq!(result.summary, "Tight walkthrough.");
        assert_eq!(result.topics, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_prose_reply_takes_heuristic_path() {
        let generator = SummaryGenerator::new(
            Some(Box::new(CannedModel {
                reply: Some("A plain prose answer about the video.".to_string()),
            })),
            4000,
        );

        let result = generator.generate(&video(), "transcript", &[]).await;

        assert_eq!(result.video_structure, "Content analyzed from transcript");
        assert_eq!(result.summary, "A plain prose answer about the video.");
    }
}
