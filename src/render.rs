//! Render a finished analysis as markdown or pretty JSON.
//!
//! Timestamp labels become watch links with a `t=` offset, so the
//! document keeps the click-to-seek behavior of the popup.

use crate::analyzer::VideoAnalysis;
use crate::error::Result;
use crate::video::{parse_time_label, watch_url, VideoContext};

/// Format the analysis as a markdown document.
pub fn render_markdown(video: &VideoContext, analysis: &VideoAnalysis) -> String {
    let mut content = String::new();

    // Header
    let title = if video.title.is_empty() {
        "Video Summary"
    } else {
        video.title.as_str()
    };
    content.push_str(&format!("# {}\n\n", title));

    content.push_str("## Video Information\n");
    if !video.channel_name.is_empty() {
        content.push_str(&format!("- **Channel**: {}\n", video.channel_name));
    }
    if !video.duration.is_empty() {
        content.push_str(&format!("- **Duration**: {}\n", video.duration));
    }
    content.push_str(&format!("- **URL**: {}\n", video.watch_url()));
    content.push_str(&format!(
        "- **Transcript**: {} chars via {}\n",
        analysis.transcript_length, analysis.transcript_source
    ));
    content.push('\n');

    content.push_str("## Summary\n\n");
    content.push_str(&format!("{}\n\n", analysis.summary));

    if !analysis.key_points.is_empty() {
        content.push_str("## Key Points\n\n");
        for point in &analysis.key_points {
            content.push_str(&format!("- {}\n", point));
        }
        content.push('\n');
    }

    if !analysis.timestamps.is_empty() {
        content.push_str("## Timestamps\n\n");
        for entry in &analysis.timestamps {
            content.push_str(&format!(
                "- {} {}\n",
                seek_label(&video.id, &entry.display_time, Some(entry.time)),
                entry.text
            ));
        }
        content.push('\n');
    }

    if !analysis.detailed_timestamps.is_empty() {
        content.push_str("## Detailed Timestamps\n\n");
        for section in &analysis.detailed_timestamps {
            content.push_str(&format!(
                "- {} **{}**: {}\n",
                seek_label(&video.id, &section.time, parse_time_label(&section.time)),
                section.title,
                section.description
            ));
        }
        content.push('\n');
    }

    if !analysis.topics.is_empty() {
        content.push_str("## Topics Covered\n\n");
        content.push_str(&format!("{}\n\n", analysis.topics.join(", ")));
    }

    if !analysis.video_structure.is_empty() {
        content.push_str("## Video Structure\n\n");
        content.push_str(&format!("{}\n\n", analysis.video_structure));
    }

    if !analysis.key_takeaways.is_empty() {
        content.push_str("## Key Takeaways\n\n");
        for takeaway in &analysis.key_takeaways {
            content.push_str(&format!("- {}\n", takeaway));
        }
        content.push('\n');
    }

    if !analysis.related_videos.is_empty() {
        content.push_str("## Related Videos\n\n");
        for related in &analysis.related_videos {
            content.push_str(&format!(
                "- [{}]({}) ({})\n",
                related.title, related.url, related.channel
            ));
        }
        content.push('\n');
    }

    // Footer
    content.push_str("---\n");
    content.push_str(&format!(
        "*Generated by yt-summarizer - {}*\n",
        analysis.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    content
}

/// Pretty JSON export of the full payload.
pub fn render_json(analysis: &VideoAnalysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// A timestamp label, linked to the watch URL when both the video id
/// and a second offset are known.
fn seek_label(video_id: &str, label: &str, seconds: Option<u32>) -> String {
    match seconds {
        Some(seconds) if !video_id.is_empty() => {
            format!("[{}]({}&t={}s)", label, watch_url(video_id), seconds)
        }
        _ => label.to_string(),
    }
}
