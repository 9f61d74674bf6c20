//! End-to-end summarize pipeline: transcript resolution, timestamp
//! extraction, summary generation, related-video lookup.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, SummarizerError};
use crate::llm::{create_model, TextModel};
use crate::page::PageObserver;
use crate::related::{RelatedVideo, RelatedVideosFetcher};
use crate::summary::{DetailedTimestamp, SummaryGenerator};
use crate::transcript::{TimestampEntry, TimestampExtractor, TranscriptResolver, TranscriptSource};
use crate::video::{format_duration_label, parse_iso8601_duration, VideoContext};
use crate::youtube::{VideoDataApi, VideoDetails, YouTubeClient};

/// Complete analysis payload for one video, in the wire shape the
/// popup consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub summary: String,
    pub key_points: Vec<String>,
    pub timestamps: Vec<TimestampEntry>,
    pub topics: Vec<String>,
    pub video_structure: String,
    pub key_takeaways: Vec<String>,
    pub related_videos: Vec<RelatedVideo>,
    pub transcript_length: usize,
    pub transcript_source: TranscriptSource,
    pub detailed_timestamps: Vec<DetailedTimestamp>,
    pub generated_at: DateTime<Utc>,
}

/// Orchestrates the summarize pipeline. Every stage degrades instead
/// of failing, so analysis always produces a payload.
pub struct Analyzer {
    transcripts: TranscriptResolver,
    extractor: TimestampExtractor,
    generator: SummaryGenerator,
    related: RelatedVideosFetcher,
}

impl Analyzer {
    /// Wire up the pipeline against the real YouTube API and whatever
    /// text model the configuration names. A missing model credential
    /// downgrades summaries to the local template instead of failing.
    pub fn new(config: &Config) -> Result<Self> {
        let api: Arc<dyn VideoDataApi> = Arc::new(YouTubeClient::new(&config.youtube)?);
        let model = match create_model(&config.model) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("⚠️ Text model unavailable ({}), summaries use the local fallback", e);
                None
            }
        };
        Self::with_parts(api, model, config)
    }

    /// Assemble the pipeline from explicit parts. Tests use this to
    /// swap in scripted doubles.
    pub fn with_parts(
        api: Arc<dyn VideoDataApi>,
        model: Option<Box<dyn TextModel>>,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            transcripts: TranscriptResolver::new(api.clone()),
            extractor: TimestampExtractor::new(
                config.summary.timestamp_threshold_seconds,
                config.summary.max_timestamps,
            )?,
            generator: SummaryGenerator::new(model, config.summary.transcript_char_budget),
            related: RelatedVideosFetcher::new(api, config.summary.related_results),
        })
    }

    /// Run the full pipeline for one video.
    pub async fn analyze(&self, video: &VideoContext) -> VideoAnalysis {
        let started = Instant::now();
        info!(
            "🚀 Summarizing video {}: {}",
            label_or(&video.id, "<no id>"),
            label_or(&video.title, "<untitled>")
        );

        let resolved = self.transcripts.resolve(video).await;
        info!(
            "📜 Transcript resolved via {} ({} chars)",
            resolved.source,
            resolved.text.chars().count()
        );

        // Fetched metadata fills holes the page scrape left, so the
        // prompt and related-video query see the best of both.
        let effective = merge_details(video, resolved.details.as_ref());

        let timestamps = self.extractor.extract(&resolved.text);
        info!("⏱️ Extracted {} timestamps", timestamps.len());

        // The related-video lookup has no data dependency on the
        // summary, so both requests go out together.
        let (summary, related_videos) = tokio::join!(
            self.generator.generate(&effective, &resolved.text, &timestamps),
            self.related.fetch(&effective)
        );

        info!(
            "✅ Summary ready for {} in {:.2}s",
            label_or(&effective.id, "<no id>"),
            started.elapsed().as_secs_f64()
        );

        VideoAnalysis {
            summary: summary.summary,
            key_points: summary.key_points,
            timestamps,
            topics: summary.topics,
            video_structure: summary.video_structure,
            key_takeaways: summary.key_takeaways,
            related_videos,
            transcript_length: resolved.text.chars().count(),
            transcript_source: resolved.source,
            detailed_timestamps: summary.detailed_timestamps,
            generated_at: Utc::now(),
        }
    }

    /// Run the pipeline pinned to a navigation generation: if the page
    /// moves to another video while the analysis is in flight, the
    /// stale result is discarded instead of delivered.
    pub async fn analyze_pinned(
        &self,
        video: &VideoContext,
        observer: &PageObserver,
        generation: u64,
    ) -> Result<VideoAnalysis> {
        let analysis = self.analyze(video).await;

        if !observer.is_current(generation).await {
            warn!(
                "🗑️ Discarding stale summary for {} (generation {} superseded)",
                label_or(&video.id, "<no id>"),
                generation
            );
            return Err(SummarizerError::Superseded);
        }

        Ok(analysis)
    }
}

fn label_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

/// Backfill empty scraped fields from fetched video details.
fn merge_details(video: &VideoContext, details: Option<&VideoDetails>) -> VideoContext {
    let mut effective = video.clone();
    if let Some(d) = details {
        if effective.title.is_empty() {
            effective.title = d.title.clone();
        }
        if effective.channel_name.is_empty() {
            effective.channel_name = d.channel_title.clone();
        }
        if effective.description.is_empty() {
            effective.description = d.description.clone();
        }
        if effective.duration.is_empty() {
            if let Some(seconds) = parse_iso8601_duration(&d.duration) {
                effective.duration = format_duration_label(seconds);
            }
        }
    }
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::testing::ScriptedApi;
    use crate::youtube::SearchHit;

    fn test_analyzer(api: ScriptedApi) -> (Analyzer, Arc<ScriptedApi>) {
        let api = Arc::new(api);
        let analyzer =
            Analyzer::with_parts(api.clone(), None, &Config::default()).unwrap();
        (analyzer, api)
    }

    fn scraped_video() -> VideoContext {
        VideoContext {
            id: "abc123def45".to_string(),
            title: "Ownership Deep Dive".to_string(),
            channel_name: "Systems Weekly".to_string(),
            url: "https://www.youtube.com/watch?v=abc123def45".to_string(),
            raw_transcript_text: "0:00 welcome to the ownership deep dive everyone\n\
                                  1:10 borrowing rules and how the checker applies them\n\
                                  2:45 lifetimes in struct definitions and functions"
                .to_string(),
            ..VideoContext::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_produces_complete_payload_without_model() {
        let (analyzer, _api) = test_analyzer(ScriptedApi {
            hits: Some(vec![SearchHit {
                video_id: "zzz999xxx11".to_string(),
                title: "Borrowing Basics".to_string(),
                channel_title: "Systems Weekly".to_string(),
                thumbnail_url: "https://i.ytimg.com/vi/zzz999xxx11/mqdefault.jpg".to_string(),
            }]),
            ..ScriptedApi::default()
        });

        let analysis = analyzer.analyze(&scraped_video()).await;

        assert_eq!(analysis.transcript_source, TranscriptSource::ContentScript);
        assert!(analysis.transcript_length > 50);
        assert!(analysis.summary.contains("Ownership Deep Dive"));
        assert!(!analysis.key_points.is_empty());
        assert_eq!(analysis.timestamps.len(), 3);
        assert_eq!(analysis.timestamps[0].time, 0);
        assert_eq!(analysis.timestamps[2].display_time, "2:45");
        assert_eq!(analysis.related_videos.len(), 1);
        assert_eq!(analysis.related_videos[0].title, "Borrowing Basics");
    }

    #[tokio::test]
    async fn test_analyze_merges_fetched_details_into_bare_context() {
        let (analyzer, _api) = test_analyzer(ScriptedApi {
            caption_tracks: Some(vec![]),
            details: Some(VideoDetails {
                title: "Fetched Title Tutorial".to_string(),
                channel_title: "Fetched Channel".to_string(),
                description: String::new(),
                duration: "PT2M5S".to_string(),
                ..VideoDetails::default()
            }),
            hits: Some(vec![]),
            ..ScriptedApi::default()
        });

        let bare = VideoContext {
            id: "abc123def45".to_string(),
            ..VideoContext::default()
        };
        let analysis = analyzer.analyze(&bare).await;

        // The local fallback summary is built from the merged context,
        // so the fetched title must show up in it.
        assert_eq!(analysis.transcript_source, TranscriptSource::Metadata);
        assert!(analysis.summary.contains("Fetched Title Tutorial"));
        assert!(analysis.summary.contains("Fetched Channel"));
    }

    #[tokio::test]
    async fn test_analyze_pinned_returns_payload_while_current() {
        let (analyzer, _api) = test_analyzer(ScriptedApi {
            hits: Some(vec![]),
            ..ScriptedApi::default()
        });
        let observer = PageObserver::new();
        let event = observer
            .observe("https://www.youtube.com/watch?v=abc123def45")
            .await
            .unwrap();

        let analysis = analyzer
            .analyze_pinned(&scraped_video(), &observer, event.generation)
            .await
            .unwrap();

        assert_eq!(analysis.transcript_source, TranscriptSource::ContentScript);
    }

    #[tokio::test]
    async fn test_analyze_pinned_discards_superseded_result() {
        let (analyzer, _api) = test_analyzer(ScriptedApi {
            hits: Some(vec![]),
            ..ScriptedApi::default()
        });
        let observer = PageObserver::new();
        let event = observer
            .observe("https://www.youtube.com/watch?v=abc123def45")
            .await
            .unwrap();

        // Navigation lands on a different video before the analysis is
        // delivered.
        observer
            .observe("https://www.youtube.com/watch?v=zzz999xxx11")
            .await
            .unwrap();

        let result = analyzer
            .analyze_pinned(&scraped_video(), &observer, event.generation)
            .await;

        assert!(matches!(result, Err(SummarizerError::Superseded)));
    }

    #[test]
    fn test_analysis_wire_shape() {
        let analysis = VideoAnalysis {
            summary: "s".to_string(),
            key_points: vec![],
            timestamps: vec![],
            topics: vec![],
            video_structure: "vs".to_string(),
            key_takeaways: vec![],
            related_videos: vec![],
            transcript_length: 7,
            transcript_source: TranscriptSource::Captions,
            detailed_timestamps: vec![],
            generated_at: Utc::now(),
        };

        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"keyPoints\""));
        assert!(json.contains("\"videoStructure\""));
        assert!(json.contains("\"keyTakeaways\""));
        assert!(json.contains("\"relatedVideos\""));
        assert!(json.contains("\"transcriptLength\":7"));
        assert!(json.contains("\"transcriptSource\":\"captions\""));
        assert!(json.contains("\"detailedTimestamps\""));
        assert!(json.contains("\"generatedAt\""));
    }
}
