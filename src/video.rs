use serde::{Deserialize, Serialize};
use url::Url;

/// Context captured for a single video page visit. Immutable once
/// built; navigation to a new video id replaces it wholesale.
///
/// Wire names match the extension payload (`videoId`, `channelName`,
/// `transcript`, ...), so a content-script client can POST its scraped
/// data unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContext {
    #[serde(rename = "videoId")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub channel_name: String,

    #[serde(default)]
    pub description: String,

    /// Duration label as the player shows it, e.g. "12:34".
    #[serde(default)]
    pub duration: String,

    #[serde(default)]
    pub url: String,

    /// Transcript text scraped from the page, if any.
    #[serde(default, rename = "transcript")]
    pub raw_transcript_text: String,
}

impl VideoContext {
    /// Canonical watch URL, falling back to the captured URL when the
    /// id is missing.
    pub fn watch_url(&self) -> String {
        if self.id.is_empty() {
            self.url.clone()
        } else {
            watch_url(&self.id)
        }
    }
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Extract the video id from a watch URL (the `v` query parameter).
pub fn extract_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Format a second offset as the timestamp label "M:SS". Minutes are
/// not folded into hours; extracted offsets never exceed 99:59.
pub fn format_offset_label(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Render a duration in seconds the way the player shows it
/// ("M:SS", or "H:MM:SS" past the hour).
pub fn format_duration_label(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Parse a "M:SS" or "H:MM:SS" label into seconds.
pub fn parse_time_label(label: &str) -> Option<u32> {
    let parts: Vec<&str> = label.trim().split(':').collect();
    match parts.as_slice() {
        [m, s] => Some(m.trim().parse::<u32>().ok()? * 60 + s.trim().parse::<u32>().ok()?),
        [h, m, s] => Some(
            h.trim().parse::<u32>().ok()? * 3600
                + m.trim().parse::<u32>().ok()? * 60
                + s.trim().parse::<u32>().ok()?,
        ),
        _ => None,
    }
}

/// Parse an ISO-8601 duration (`PT1H2M5S`) as emitted by the page's
/// `meta[itemprop=duration]` tag.
pub fn parse_iso8601_duration(value: &str) -> Option<u32> {
    let rest = value.trim().strip_prefix("PT")?;
    let mut seconds = 0u32;
    let mut digits = String::new();
    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else {
            let n: u32 = digits.parse().ok()?;
            digits.clear();
            match ch {
                'H' => seconds += n * 3600,
                'M' => seconds += n * 60,
                'S' => seconds += n,
                _ => return None,
            }
        }
    }
    if !digits.is_empty() {
        return None;
    }
    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL123&v=abc123&t=42"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn video_id_missing_or_invalid() {
        assert_eq!(extract_video_id("https://www.youtube.com/feed/subscriptions"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(extract_video_id("not a url"), None);
    }

    #[test]
    fn offset_labels() {
        assert_eq!(format_offset_label(0), "0:00");
        assert_eq!(format_offset_label(65), "1:05");
        assert_eq!(format_offset_label(3725), "62:05");
    }

    #[test]
    fn duration_labels() {
        assert_eq!(format_duration_label(59), "0:59");
        assert_eq!(format_duration_label(3725), "1:02:05");
    }

    #[test]
    fn time_labels_parse() {
        assert_eq!(parse_time_label("1:05"), Some(65));
        assert_eq!(parse_time_label("1:02:05"), Some(3725));
        assert_eq!(parse_time_label("oops"), None);
    }

    #[test]
    fn iso8601_durations() {
        assert_eq!(parse_iso8601_duration("PT1H2M5S"), Some(3725));
        assert_eq!(parse_iso8601_duration("PT15M33S"), Some(933));
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
        assert_eq!(parse_iso8601_duration("12:34"), None);
    }

    #[test]
    fn wire_names_round_trip() {
        let json = r#"{
            "videoId": "abc123",
            "title": "A Video",
            "channelName": "A Channel",
            "description": "",
            "duration": "10:00",
            "url": "https://www.youtube.com/watch?v=abc123",
            "transcript": "0:00 hello there everyone"
        }"#;
        let ctx: VideoContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.id, "abc123");
        assert_eq!(ctx.channel_name, "A Channel");
        assert_eq!(ctx.raw_transcript_text, "0:00 hello there everyone");

        let back = serde_json::to_value(&ctx).unwrap();
        assert_eq!(back["videoId"], "abc123");
        assert_eq!(back["channelName"], "A Channel");
        assert_eq!(back["transcript"], "0:00 hello there everyone");
    }
}
