pub mod client;

pub use client::YouTubeClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata for a single video as returned by the data API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoDetails {
    pub title: String,
    pub channel_title: String,
    pub description: String,
    pub tags: Vec<String>,

    /// ISO-8601 duration, e.g. "PT12M34S".
    pub duration: String,

    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
}

/// One hit from a keyword video search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
}

/// The slice of the video data API the pipeline depends on. A trait so
/// tests can swap in a scripted double and count calls.
#[async_trait]
pub trait VideoDataApi: Send + Sync {
    /// List caption track ids for a video, best track first.
    async fn list_caption_tracks(&self, video_id: &str) -> Result<Vec<String>>;

    /// Download the text payload of a caption track.
    async fn download_caption(&self, track_id: &str) -> Result<String>;

    /// Fetch snippet, duration and statistics for a video.
    async fn video_details(&self, video_id: &str) -> Result<VideoDetails>;

    /// Keyword search for videos.
    async fn search_videos(&self, query: &str, max_results: u8) -> Result<Vec<SearchHit>>;
}
