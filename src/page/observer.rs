//! Navigation watching for the single-page watch UI.
//!
//! YouTube swaps videos in place without a full page load, so "a new
//! video" means "the video id in the URL changed". The observer keeps
//! that cursor, deduplicates repeat sightings of the same id, and hands
//! out a generation number so long-running work can tell whether the
//! page has moved on underneath it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::video::extract_video_id;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// A confirmed move to a new video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub video_id: String,
    pub url: String,
    /// Monotonic count of navigations seen so far. Work started for an
    /// older generation is stale once a newer one exists.
    pub generation: u64,
}

#[derive(Debug, Default)]
struct WatchCursor {
    current_video_id: Option<String>,
    generation: u64,
}

/// Tracks the current video and publishes navigation events.
#[derive(Debug, Clone)]
pub struct PageObserver {
    cursor: Arc<RwLock<WatchCursor>>,
    events: broadcast::Sender<NavigationEvent>,
}

impl PageObserver {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            cursor: Arc::new(RwLock::new(WatchCursor::default())),
            events,
        }
    }

    /// Report a URL sighting. Returns a navigation event when the URL
    /// carries a video id different from the current one, `None` when
    /// there is no id or the id is unchanged.
    pub async fn observe(&self, url: &str) -> Option<NavigationEvent> {
        let video_id = match extract_video_id(url) {
            Some(id) => id,
            None => {
                debug!("👀 No video id in URL, ignoring: {}", url);
                return None;
            }
        };

        let mut cursor = self.cursor.write().await;
        if cursor.current_video_id.as_deref() == Some(video_id.as_str()) {
            debug!("👀 Same video {}, skipping re-evaluation", video_id);
            return None;
        }

        cursor.current_video_id = Some(video_id.clone());
        cursor.generation += 1;

        let event = NavigationEvent {
            video_id,
            url: url.to_string(),
            generation: cursor.generation,
        };
        info!(
            "🧭 Navigation to video {} (generation {})",
            event.video_id, event.generation
        );

        // No subscribers is fine; observe() callers get the event back directly.
        let _ = self.events.send(event.clone());

        Some(event)
    }

    /// Subscribe to future navigation events. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    pub async fn generation(&self) -> u64 {
        self.cursor.read().await.generation
    }

    /// Whether work started at `generation` still matches the page.
    pub async fn is_current(&self, generation: u64) -> bool {
        self.cursor.read().await.generation == generation
    }

    pub async fn current_video_id(&self) -> Option<String> {
        self.cursor.read().await.current_video_id.clone()
    }
}

impl Default for PageObserver {
    fn default() -> Self {
        Self::new()
    }
}
