use super::{SearchHit, VideoDataApi, VideoDetails};
use crate::config::YouTubeConfig;
use crate::error::{Result, SummarizerError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "YouTube";

/// Client for the YouTube Data API v3.
pub struct YouTubeClient {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|source| SummarizerError::ApiRequest { service: SERVICE, source })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(k) if !k.is_empty() => Ok(k),
            _ => Err(SummarizerError::MissingCredential {
                env_var: "YOUTUBE_API_KEY",
            }),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SummarizerError::ApiRequest { service: SERVICE, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::ApiStatus {
                service: SERVICE,
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get(url)
            .await?
            .json()
            .await
            .map_err(|source| SummarizerError::ApiRequest { service: SERVICE, source })
    }
}

#[async_trait]
impl VideoDataApi for YouTubeClient {
    async fn list_caption_tracks(&self, video_id: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/captions?part=snippet&videoId={}&key={}",
            self.api_base,
            video_id,
            self.key()?
        );

        debug!("📋 Listing caption tracks for {}", video_id);
        let response: CaptionListResponse = self.get_json(&url).await?;

        Ok(response.items.into_iter().map(|item| item.id).collect())
    }

    async fn download_caption(&self, track_id: &str) -> Result<String> {
        let url = format!("{}/captions/{}?key={}", self.api_base, track_id, self.key()?);

        debug!("💬 Downloading caption track {}", track_id);
        let response = self.get(&url).await?;

        response
            .text()
            .await
            .map_err(|source| SummarizerError::ApiRequest { service: SERVICE, source })
    }

    async fn video_details(&self, video_id: &str) -> Result<VideoDetails> {
        let url = format!(
            "{}/videos?part=snippet,contentDetails,statistics&id={}&key={}",
            self.api_base,
            video_id,
            self.key()?
        );

        debug!("📺 Fetching video details for {}", video_id);
        let response: VideoListResponse = self.get_json(&url).await?;

        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| SummarizerError::VideoNotFound {
                video_id: video_id.to_string(),
            })?;

        Ok(details_from_item(item))
    }

    async fn search_videos(&self, query: &str, max_results: u8) -> Result<Vec<SearchHit>> {
        let url = format!(
            "{}/search?part=snippet&q={}&type=video&maxResults={}&key={}",
            self.api_base,
            urlencoding::encode(query),
            max_results,
            self.key()?
        );

        debug!("🔍 Searching videos for '{}'", query);
        let response: SearchListResponse = self.get_json(&url).await?;

        Ok(hits_from_items(response.items))
    }
}

fn details_from_item(item: VideoItem) -> VideoDetails {
    let snippet = item.snippet.unwrap_or_default();
    let content_details = item.content_details.unwrap_or_default();
    let statistics = item.statistics.unwrap_or_default();

    VideoDetails {
        title: snippet.title,
        channel_title: snippet.channel_title,
        description: snippet.description,
        tags: snippet.tags,
        duration: content_details.duration,
        view_count: parse_count(statistics.view_count),
        like_count: parse_count(statistics.like_count),
        comment_count: parse_count(statistics.comment_count),
    }
}

fn hits_from_items(items: Vec<SearchItem>) -> Vec<SearchHit> {
    items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let snippet = item.snippet.unwrap_or_default();
            let thumbnail_url = snippet
                .thumbnails
                .and_then(|t| t.medium.or(t.standard))
                .map(|t| t.url)
                .unwrap_or_default();

            Some(SearchHit {
                video_id,
                title: snippet.title,
                channel_title: snippet.channel_title,
                thumbnail_url,
            })
        })
        .collect()
}

/// Statistics counts arrive as JSON strings.
fn parse_count(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.parse().ok())
}

#[derive(Debug, Deserialize)]
struct CaptionListResponse {
    #[serde(default)]
    items: Vec<CaptionItem>,
}

#[derive(Debug, Deserialize)]
struct CaptionItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Option<VideoSnippet>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchSnippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    standard: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}
