pub mod timestamps;

pub use timestamps::{TimestampEntry, TimestampExtractor};

use crate::error::Result;
use crate::video::{format_duration_label, parse_iso8601_duration, VideoContext};
use crate::youtube::{VideoDataApi, VideoDetails};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Page-scraped text shorter than this is treated as absent.
const MIN_SCRAPED_CHARS: usize = 50;

/// Caption payloads shorter than this are rejected as junk.
const MIN_CAPTION_CHARS: usize = 100;

/// A formatted description block must reach this size to stand in for
/// a transcript.
const MIN_DESCRIPTION_CHARS: usize = 50;

/// Last-resort transcript text when no stage produced anything.
const FALLBACK_TEXT: &str =
    "Video content analysis available. The summary will be based on whatever video information could be retrieved.";

/// Which fallback stage produced the transcript text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    ContentScript,
    Captions,
    Description,
    Metadata,
    Fallback,
}

impl TranscriptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptSource::ContentScript => "content_script",
            TranscriptSource::Captions => "captions",
            TranscriptSource::Description => "description",
            TranscriptSource::Metadata => "metadata",
            TranscriptSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved transcript plus whatever metadata the resolution fetched
/// along the way, so later stages don't repeat the lookup.
#[derive(Debug, Clone)]
pub struct ResolvedTranscript {
    pub text: String,
    pub source: TranscriptSource,
    pub details: Option<VideoDetails>,
}

/// Resolves transcript text through an ordered fallback chain:
/// page scrape, caption download, description text, synthesized
/// metadata, fixed fallback. A stage failure is logged and control
/// falls through; resolution itself never fails.
pub struct TranscriptResolver {
    api: Arc<dyn VideoDataApi>,
}

impl TranscriptResolver {
    pub fn new(api: Arc<dyn VideoDataApi>) -> Self {
        Self { api }
    }

    pub async fn resolve(&self, video: &VideoContext) -> ResolvedTranscript {
        let scraped = video.raw_transcript_text.trim();
        if scraped.chars().count() >= MIN_SCRAPED_CHARS {
            info!("📜 Using page-scraped transcript ({} chars)", scraped.chars().count());
            return ResolvedTranscript {
                text: scraped.to_string(),
                source: TranscriptSource::ContentScript,
                details: None,
            };
        }

        match self.try_captions(&video.id).await {
            Ok(Some(text)) => {
                info!("💬 Using caption transcript ({} chars)", text.chars().count());
                return ResolvedTranscript {
                    text,
                    source: TranscriptSource::Captions,
                    details: None,
                };
            }
            Ok(None) => {}
            Err(e) => warn!("⚠️ Caption extraction failed: {}", e),
        }

        let details = match self.api.video_details(&video.id).await {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("⚠️ Video details unavailable: {}", e);
                None
            }
        };

        // A description block is only a usable stand-in when there is
        // an actual description; filler lines alone say nothing.
        if let Some(d) = &details {
            if !d.description.trim().is_empty() {
                let block = format_description_block(d);
                if block.chars().count() >= MIN_DESCRIPTION_CHARS {
                    info!("📄 Using description text ({} chars)", block.chars().count());
                    return ResolvedTranscript {
                        text: block,
                        source: TranscriptSource::Description,
                        details,
                    };
                }
            }
        }

        if let Some(text) = synthesize_metadata(video, details.as_ref()) {
            info!("📝 Synthesized metadata transcript ({} chars)", text.chars().count());
            return ResolvedTranscript {
                text,
                source: TranscriptSource::Metadata,
                details,
            };
        }

        warn!("❌ No usable video information, using fixed fallback text");
        ResolvedTranscript {
            text: FALLBACK_TEXT.to_string(),
            source: TranscriptSource::Fallback,
            details,
        }
    }

    /// First caption track's payload, if it is big enough to be real.
    async fn try_captions(&self, video_id: &str) -> Result<Option<String>> {
        if video_id.is_empty() {
            return Ok(None);
        }

        let tracks = self.api.list_caption_tracks(video_id).await?;
        let track_id = match tracks.first() {
            Some(id) => id,
            None => return Ok(None),
        };

        let text = self.api.download_caption(track_id).await?;
        if text.chars().count() >= MIN_CAPTION_CHARS {
            Ok(Some(text))
        } else {
            Ok(None)
        }
    }
}

/// Format fetched metadata as the structured text block used in place
/// of a transcript.
fn format_description_block(details: &VideoDetails) -> String {
    let description = if details.description.is_empty() {
        "No description available"
    } else {
        &details.description
    };
    let tags = if details.tags.is_empty() {
        "No tags".to_string()
    } else {
        details.tags.join(", ")
    };

    format!(
        "Video Title: {}\nChannel: {}\nDescription: {}\nTags: {}",
        details.title, details.channel_title, description, tags
    )
}

/// Build a pseudo-transcript from whatever metadata survived, or None
/// when there is nothing at all to describe.
fn synthesize_metadata(video: &VideoContext, details: Option<&VideoDetails>) -> Option<String> {
    let title = details
        .map(|d| d.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(&video.title);
    let channel = details
        .map(|d| d.channel_title.as_str())
        .filter(|c| !c.is_empty())
        .unwrap_or(&video.channel_name);

    if title.is_empty() && channel.is_empty() {
        return None;
    }

    let duration = details
        .and_then(|d| parse_iso8601_duration(&d.duration))
        .map(format_duration_label)
        .or_else(|| {
            if video.duration.is_empty() {
                None
            } else {
                Some(video.duration.clone())
            }
        })
        .unwrap_or_else(|| "Unknown".to_string());

    let mut text = format!("Video Title: {}\n", title);
    text.push_str(&format!("Channel: {}\n", channel));
    text.push_str(&format!("Duration: {}\n", duration));
    text.push_str(&format!("View Count: {}\n", count_label(details.and_then(|d| d.view_count))));
    text.push_str(&format!("Like Count: {}\n", count_label(details.and_then(|d| d.like_count))));
    text.push_str(&format!(
        "Comment Count: {}\n",
        count_label(details.and_then(|d| d.comment_count))
    ));

    let description = details
        .map(|d| d.description.as_str())
        .filter(|d| !d.is_empty())
        .unwrap_or(&video.description);
    if !description.is_empty() {
        text.push_str(&format!("\nDescription:\n{}\n", description));
    }

    if let Some(d) = details {
        if !d.tags.is_empty() {
            text.push_str(&format!("\nTags: {}\n", d.tags.join(", ")));
        }
    }

    if let Some((content_type, expected)) = classify_title(title) {
        text.push_str(&format!("\nContent Type: {}\n", content_type));
        text.push_str(&format!("Expected Content: {}\n", expected));
    }

    Some(text)
}

fn count_label(count: Option<u64>) -> String {
    match count {
        Some(n) => n.to_string(),
        None => "Unknown".to_string(),
    }
}

/// Guess the kind of video from title keywords.
fn classify_title(title: &str) -> Option<(&'static str, &'static str)> {
    let title = title.to_lowercase();
    if title.contains("tutorial") || title.contains("how to") {
        Some((
            "Tutorial/How-to video",
            "Step-by-step instructions, demonstrations, explanations",
        ))
    } else if title.contains("review") || title.contains("test") {
        Some((
            "Review/Testing video",
            "Product analysis, testing results, comparisons",
        ))
    } else if title.contains("process") || title.contains("workflow") {
        Some((
            "Process/Workflow video",
            "Detailed process explanation, workflow demonstration",
        ))
    } else if title.contains("client") || title.contains("project") {
        Some((
            "Client/Project video",
            "Project walkthrough, client work demonstration",
        ))
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::SummarizerError;
    use crate::youtube::SearchHit;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted stand-in for the data API. `None` fields fail the call;
    /// every call is recorded for assertions.
    #[derive(Default)]
    pub struct ScriptedApi {
        pub caption_tracks: Option<Vec<String>>,
        pub caption_text: Option<String>,
        pub details: Option<VideoDetails>,
        pub hits: Option<Vec<SearchHit>>,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedApi {
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn record(&self, name: &'static str) {
            self.calls.lock().unwrap().push(name);
        }

        fn fail() -> SummarizerError {
            SummarizerError::MissingCredential {
                env_var: "YOUTUBE_API_KEY",
            }
        }
    }

    #[async_trait]
    impl VideoDataApi for ScriptedApi {
        async fn list_caption_tracks(&self, _video_id: &str) -> Result<Vec<String>> {
            self.record("list_caption_tracks");
            self.caption_tracks.clone().ok_or_else(Self::fail)
        }

        async fn download_caption(&self, _track_id: &str) -> Result<String> {
            self.record("download_caption");
            self.caption_text.clone().ok_or_else(Self::fail)
        }

        async fn video_details(&self, _video_id: &str) -> Result<VideoDetails> {
            self.record("video_details");
            self.details.clone().ok_or_else(Self::fail)
        }

        async fn search_videos(&self, _query: &str, _max_results: u8) -> Result<Vec<SearchHit>> {
            self.record("search_videos");
            self.hits.clone().ok_or_else(Self::fail)
        }
    }
}
