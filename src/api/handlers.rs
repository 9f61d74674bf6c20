//! API request handlers

use serde_json::Value;
use tracing::info;

use crate::analyzer::{Analyzer, VideoAnalysis};
use crate::error::{Result, SummarizerError};
use crate::page::PageObserver;

use super::models::{NavigateResponse, SummarizeRequest};

const SUMMARIZE_ACTION: &str = "summarizeVideo";

/// Handle health check requests
pub async fn health_check() -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "yt-summarizer",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Handle a summarize request from the content-script client.
///
/// The request's video registers as a navigation sighting first, so a
/// later navigation can supersede this analysis while it runs.
pub async fn summarize_video(
    analyzer: &Analyzer,
    observer: &PageObserver,
    request: &SummarizeRequest,
) -> Result<VideoAnalysis> {
    if let Some(action) = request.action.as_deref() {
        if action != SUMMARIZE_ACTION {
            return Err(SummarizerError::UnknownAction {
                action: action.to_string(),
            });
        }
    }

    let video = &request.video_data;
    info!("📨 Summarize request for video: {}", video.id);

    // A repeat request for the current video observes as None; it still
    // runs, pinned to the unchanged generation.
    let generation = match observer.observe(&video.watch_url()).await {
        Some(event) => event.generation,
        None => observer.generation().await,
    };

    analyzer.analyze_pinned(video, observer, generation).await
}

/// Handle a navigation report from the page watcher.
pub async fn report_navigation(observer: &PageObserver, url: &str) -> NavigateResponse {
    match observer.observe(url).await {
        Some(event) => NavigateResponse {
            video_id: Some(event.video_id),
            changed: true,
            generation: event.generation,
        },
        None => NavigateResponse {
            video_id: observer.current_video_id().await,
            changed: false,
            generation: observer.generation().await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::transcript::testing::ScriptedApi;
    use crate::video::VideoContext;
    use std::sync::Arc;

    fn parts() -> (Analyzer, PageObserver) {
        let api = Arc::new(ScriptedApi {
            hits: Some(vec![]),
            ..ScriptedApi::default()
        });
        let analyzer = Analyzer::with_parts(api, None, &Config::default()).unwrap();
        (analyzer, PageObserver::new())
    }

    fn request_for(video_id: &str) -> SummarizeRequest {
        SummarizeRequest {
            action: Some(SUMMARIZE_ACTION.to_string()),
            video_data: VideoContext {
                id: video_id.to_string(),
                title: "Parsing With Nom".to_string(),
                raw_transcript_text:
                    "0:00 introduction to parser combinators and the nom crate in rust"
                        .to_string(),
                ..VideoContext::default()
            },
        }
    }

    #[tokio::test]
    async fn test_health_payload() {
        let health = health_check().await;
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["service"], "yt-summarizer");
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() {
        let (analyzer, observer) = parts();
        let mut request = request_for("abc123def45");
        request.action = Some("deleteEverything".to_string());

        let result = summarize_video(&analyzer, &observer, &request).await;

        assert!(matches!(
            result,
            Err(SummarizerError::UnknownAction { ref action }) if action == "deleteEverything"
        ));
    }

    #[tokio::test]
    async fn test_summarize_registers_navigation() {
        let (analyzer, observer) = parts();

        let analysis = summarize_video(&analyzer, &observer, &request_for("abc123def45"))
            .await
            .unwrap();

        assert!(analysis.summary.contains("Parsing With Nom"));
        assert_eq!(
            observer.current_video_id().await.as_deref(),
            Some("abc123def45")
        );
    }

    #[tokio::test]
    async fn test_repeat_summarize_for_same_video_succeeds() {
        let (analyzer, observer) = parts();
        let request = request_for("abc123def45");

        summarize_video(&analyzer, &observer, &request).await.unwrap();
        let second = summarize_video(&analyzer, &observer, &request).await;

        assert!(second.is_ok());
        assert_eq!(observer.generation().await, 1);
    }

    #[tokio::test]
    async fn test_missing_action_defaults_to_summarize() {
        let (analyzer, observer) = parts();
        let mut request = request_for("abc123def45");
        request.action = None;

        let result = summarize_video(&analyzer, &observer, &request).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_navigation_report_round_trip() {
        let (_, observer) = parts();

        let report =
            report_navigation(&observer, "https://www.youtube.com/watch?v=abc123def45").await;
        assert_eq!(report.video_id.as_deref(), Some("abc123def45"));
        assert!(report.changed);
        assert_eq!(report.generation, 1);

        let repeat =
            report_navigation(&observer, "https://www.youtube.com/watch?v=abc123def45").await;
        assert_eq!(repeat.video_id.as_deref(), Some("abc123def45"));
        assert!(!repeat.changed);
        assert_eq!(repeat.generation, 1);
    }
}
