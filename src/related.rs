use crate::video::{watch_url, VideoContext};
use crate::youtube::VideoDataApi;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// 120x90 light-gray rectangle, inlined so the placeholder renders
/// without any network access.
const PLACEHOLDER_THUMBNAIL: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMTIwIiBoZWlnaHQ9IjkwIiB2aWV3Qm94PSIwIDAgMTIwIDkwIiBmaWxsPSJub25lIiB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciPjxyZWN0IHdpZHRoPSIxMjAiIGhlaWdodD0iOTAiIGZpbGw9IiNmMGYwZjAiLz48L3N2Zz4=";

/// A suggestion shown next to the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedVideo {
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub url: String,
    pub duration: String,
}

/// Fetches videos related to the current one by searching for the
/// first few title words. Failures degrade to a single placeholder
/// entry; this never errors.
pub struct RelatedVideosFetcher {
    api: Arc<dyn VideoDataApi>,
    max_results: u8,
}

impl RelatedVideosFetcher {
    pub fn new(api: Arc<dyn VideoDataApi>, max_results: u8) -> Self {
        Self { api, max_results }
    }

    pub async fn fetch(&self, video: &VideoContext) -> Vec<RelatedVideo> {
        let query = search_query(&video.title);
        if query.is_empty() {
            warn!("⚠️ No title to search related videos with");
            return placeholder_entries();
        }

        match self.api.search_videos(&query, self.max_results).await {
            Ok(hits) => {
                debug!("🔍 Found {} related videos for '{}'", hits.len(), query);
                hits.into_iter()
                    .map(|hit| RelatedVideo {
                        title: hit.title,
                        channel: hit.channel_title,
                        thumbnail: hit.thumbnail_url,
                        url: watch_url(&hit.video_id),
                        // A per-video duration would need another details call.
                        duration: "N/A".to_string(),
                    })
                    .collect()
            }
            Err(e) => {
                warn!("⚠️ Related video search failed: {}", e);
                placeholder_entries()
            }
        }
    }
}

/// First three words of the title make the search query.
fn search_query(title: &str) -> String {
    title.split_whitespace().take(3).collect::<Vec<_>>().join(" ")
}

fn placeholder_entries() -> Vec<RelatedVideo> {
    vec![RelatedVideo {
        title: "Related videos will appear here".to_string(),
        channel: "Enable API access".to_string(),
        thumbnail: PLACEHOLDER_THUMBNAIL.to_string(),
        url: "#".to_string(),
        duration: "N/A".to_string(),
    }]
}
