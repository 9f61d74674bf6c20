use thiserror::Error;

/// Error taxonomy for the summarizer pipeline.
///
/// Fallback stages catch and log these instead of propagating them; a
/// value of this type only reaches a caller once every degraded path is
/// exhausted.
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("{service} request failed: {source}")]
    ApiRequest {
        service: &'static str,
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    ApiStatus {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("missing credential: set {env_var} or the matching config field")]
    MissingCredential { env_var: &'static str },

    #[error("model response could not be decoded: {reason}")]
    ModelDecode { reason: String },

    #[error("model returned an empty response")]
    EmptyModelResponse,

    #[error("no video id in URL: {url}")]
    NoVideoId { url: String },

    #[error("video not found: {video_id}")]
    VideoNotFound { video_id: String },

    #[error("request superseded by navigation to a different video")]
    Superseded,

    #[error("unknown action: {action}")]
    UnknownAction { action: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, SummarizerError>;
