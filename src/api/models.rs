//! API data models

use serde::{Deserialize, Serialize};

use crate::video::VideoContext;

/// Response envelope for every endpoint: `{success, data | error}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Summarize request as the content-script client sends it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Message action; only "summarizeVideo" is understood.
    #[serde(default)]
    pub action: Option<String>,
    pub video_data: VideoContext,
}

/// Navigation report from the page watcher.
#[derive(Debug, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub url: String,
}

/// Outcome of a navigation report. `changed` is false when the sighting
/// was a duplicate of the current video.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub video_id: Option<String>,
    pub changed: bool,
    pub generation: u64,
}
