//! Best-effort extraction of video context from a captured watch page.
//!
//! YouTube's markup shifts between layout experiments, so every field
//! is looked up through an ordered list of candidate selectors; the
//! first hit wins and a miss is expected, not an error.

use crate::error::{Result, SummarizerError};
use crate::video::{extract_video_id, format_duration_label, parse_iso8601_duration, VideoContext};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

const SERVICE: &str = "watch page";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Panel text below this is padded with description and comment text.
const THIN_TRANSCRIPT_CHARS: usize = 100;

/// Below this, tag and category metadata get appended as well.
const BARE_TRANSCRIPT_CHARS: usize = 50;

const TITLE_SELECTORS: &[&str] = &[
    "h1.ytd-video-primary-info-renderer",
    "h1.title",
    "h1.ytd-watch-metadata",
    "#title h1",
];

const CHANNEL_SELECTORS: &[&str] = &["#channel-name a", "ytd-channel-name a", "#owner-name a"];

const DESCRIPTION_SELECTORS: &[&str] = &["#description-text", "#description"];

const DURATION_SELECTORS: &[&str] = &[".ytp-time-duration"];

const TRANSCRIPT_PANEL_SELECTORS: &[&str] = &[
    "#transcript",
    "ytd-transcript-renderer",
    "[data-target-id=\"transcript\"]",
    ".ytd-transcript-renderer",
    "#transcript-container",
];

const TRANSCRIPT_SEGMENT_SELECTORS: &[&str] = &[
    ".ytd-transcript-segment-renderer",
    "[data-target-id=\"transcript-segment\"]",
    ".transcript-segment",
];

const SEGMENT_TIME_SELECTOR: &str = "[id*=\"timestamp\"], .timestamp, [data-target-id*=\"timestamp\"]";
const SEGMENT_TEXT_SELECTOR: &str = "[id*=\"content\"], .content, [data-target-id*=\"content\"], #content-text";

const COMMENT_SELECTORS: &[&str] = &[
    "#content-text",
    ".ytd-comment-renderer #content-text",
    "[data-target-id=\"comment-content\"]",
];

/// Pull a [`VideoContext`] out of a captured watch-page document.
/// Missing elements yield empty fields, never errors.
pub fn extract_video_context(html: &str, url: &str) -> VideoContext {
    let document = Html::parse_document(html);

    let description = extract_description(&document);
    let context = VideoContext {
        id: extract_video_id(url).unwrap_or_default(),
        title: extract_title(&document),
        channel_name: extract_channel(&document),
        description: description.clone(),
        duration: extract_duration(&document),
        url: url.to_string(),
        raw_transcript_text: extract_transcript_text(&document, &description),
    };

    debug!(
        "🔎 Extracted page context: title {} chars, transcript {} chars",
        context.title.chars().count(),
        context.raw_transcript_text.chars().count()
    );

    context
}

/// Download a watch page and extract its context. For already captured
/// HTML use [`extract_video_context`] directly.
pub async fn fetch_video_context(url: &str, timeout_seconds: u64) -> Result<VideoContext> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .map_err(|source| SummarizerError::ApiRequest { service: SERVICE, source })?;

    info!("🌐 Fetching watch page: {}", url);
    let response = client
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

    let html = response
        .text()
        .await
        .map_err(|source| SummarizerError::ApiRequest { service: SERVICE, source })?;
    debug!("📄 Downloaded {} characters of HTML", html.chars().count());

    Ok(extract_video_context(&html, url))
}

fn extract_title(document: &Html) -> String {
    if let Some(title) = first_text(document, TITLE_SELECTORS) {
        return title;
    }

    if let Some(title) = attr_content(document, "meta[property=\"og:title\"]") {
        return title;
    }

    // The document title carries a suffix the player UI doesn't show.
    first_text(document, &["title"])
        .map(|t| t.trim_end_matches(" - YouTube").to_string())
        .unwrap_or_default()
}

fn extract_channel(document: &Html) -> String {
    if let Some(channel) = first_text(document, CHANNEL_SELECTORS) {
        return channel;
    }

    attr_content(document, "link[itemprop=\"name\"]").unwrap_or_default()
}

fn extract_description(document: &Html) -> String {
    if let Some(description) = first_text(document, DESCRIPTION_SELECTORS) {
        return description;
    }

    attr_content(document, "meta[property=\"og:description\"]")
        .or_else(|| attr_content(document, "meta[name=\"description\"]"))
        .unwrap_or_default()
}

fn extract_duration(document: &Html) -> String {
    if let Some(duration) = first_text(document, DURATION_SELECTORS) {
        return duration;
    }

    // Player markup absent; the microdata tag still knows the length.
    attr_content(document, "meta[itemprop=\"duration\"]")
        .and_then(|value| parse_iso8601_duration(&value))
        .map(format_duration_label)
        .unwrap_or_default()
}

/// Rebuild "label text" transcript lines from the transcript panel, the
/// same shape the timestamp extractor expects. Thin panel text is padded
/// with whatever else the page still says about the video: description
/// and comments first, tag and category metadata when even that is bare.
fn extract_transcript_text(document: &Html, description: &str) -> String {
    let mut transcript = panel_transcript(document);

    if transcript.chars().count() < THIN_TRANSCRIPT_CHARS {
        if description.chars().count() > 50 {
            transcript.push_str(&format!("\nDescription: {}\n", description));
        }

        let comments = comment_lines(document);
        if !comments.is_empty() {
            transcript.push_str(&format!("\nComments: {}\n", comments.join("\n")));
        }
    }

    if transcript.chars().count() < BARE_TRANSCRIPT_CHARS {
        let tags = attr_contents(
            document,
            "meta[property=\"og:video:tag\"], meta[name=\"keywords\"]",
        );
        if !tags.is_empty() {
            transcript.push_str(&format!("\nTags: {}\n", tags.join(", ")));
        }

        if let Some(category) = attr_content(
            document,
            "meta[property=\"og:video:category\"], meta[name=\"category\"]",
        ) {
            transcript.push_str(&format!("Category: {}\n", category));
        }
    }

    transcript.trim().to_string()
}

fn panel_transcript(document: &Html) -> String {
    let panel = match first_element(document, TRANSCRIPT_PANEL_SELECTORS) {
        Some(panel) => panel,
        None => return String::new(),
    };

    let mut segments = Vec::new();
    for selector_str in TRANSCRIPT_SEGMENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            segments = panel.select(&selector).collect();
            if !segments.is_empty() {
                break;
            }
        }
    }

    let time_selector = match Selector::parse(SEGMENT_TIME_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };
    let text_selector = match Selector::parse(SEGMENT_TEXT_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };

    let mut transcript = String::new();
    for segment in segments {
        let time = segment
            .select(&time_selector)
            .next()
            .map(|el| collapse_text(el.text()));
        let text = match segment
            .select(&text_selector)
            .next()
            .map(|el| collapse_text(el.text()))
            .filter(|t| !t.is_empty())
        {
            Some(text) => text,
            None => continue,
        };

        match time {
            Some(time) if !time.is_empty() => {
                transcript.push_str(&format!("{} {}\n", time, text));
            }
            _ => {
                transcript.push_str(&text);
                transcript.push('\n');
            }
        }
    }

    transcript
}

/// First five comment texts longer than ten characters.
fn comment_lines(document: &Html) -> Vec<String> {
    for selector_str in COMMENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            let lines: Vec<String> = document
                .select(&selector)
                .take(5)
                .map(|el| collapse_text(el.text()))
                .filter(|text| text.chars().count() > 10)
                .collect();
            if !lines.is_empty() {
                return lines;
            }
        }
    }
    Vec::new()
}

fn first_element<'a>(document: &'a Html, selectors: &[&str]) -> Option<scraper::ElementRef<'a>> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    first_element(document, selectors)
        .map(|el| collapse_text(el.text()))
        .filter(|text| !text.is_empty())
}

fn attr_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    let element = document.select(&selector).next()?;
    element
        .value()
        .attr("content")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn attr_contents(document: &Html, selector_str: &str) -> Vec<String> {
    let selector = match Selector::parse(selector_str) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Join text nodes and squeeze runs of whitespace to single spaces.
fn collapse_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
