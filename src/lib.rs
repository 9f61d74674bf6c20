/// YouTube Video Summarizer - Rust Implementation
///
/// Resolves a transcript for a video through a fallback chain, extracts
/// timestamps, asks a text model for a structured summary (with layered
/// decoding of whatever comes back), and fetches related videos. Served
/// over a small HTTP API or run once from the CLI.

pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod page;
pub mod related;
pub mod render;
pub mod summary;
pub mod transcript;
pub mod video;
pub mod youtube;

// Re-export main types for easy access
pub use crate::analyzer::{Analyzer, VideoAnalysis};
pub use crate::config::Config;
pub use crate::error::{Result, SummarizerError};
pub use crate::llm::{create_model, ModelConfig, ModelProvider, TextModel};
pub use crate::page::{extract_video_context, fetch_video_context, NavigationEvent, PageObserver};
pub use crate::related::{RelatedVideo, RelatedVideosFetcher};
pub use crate::render::{render_json, render_markdown};
pub use crate::summary::{SummaryGenerator, SummaryResult};
pub use crate::transcript::{
    TimestampEntry, TimestampExtractor, TranscriptResolver, TranscriptSource,
};
pub use crate::video::VideoContext;
pub use crate::youtube::{VideoDataApi, VideoDetails, YouTubeClient};
