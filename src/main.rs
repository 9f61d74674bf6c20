use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use yt_summarizer_rust::api::ApiServer;
use yt_summarizer_rust::page::{extract_video_context, fetch_video_context, PageObserver};
use yt_summarizer_rust::{render_json, render_markdown, Analyzer, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("YouTube Video Summarizer (Rust)")
        .version("0.1.0")
        .about("AI-powered video summaries from saved watch pages or video URLs")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("Watch URL of the video to summarize")
        )
        .arg(
            Arg::new("html")
                .long("html")
                .value_name("FILE")
                .help("Saved watch-page HTML to extract video context from")
        )
        .arg(
            Arg::new("transcript")
                .short('t')
                .long("transcript")
                .value_name("FILE")
                .help("Transcript text file, used instead of page extraction")
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format for the summary")
                .default_value("markdown")
                .value_parser(["markdown", "json"])
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the summary to a file instead of stdout")
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .help("Run the HTTP API instead of a one-shot summary")
                .action(clap::ArgAction::SetTrue)
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the HTTP API (overrides config)")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    // Configure logging based on verbose flag
    if matches.get_flag("verbose") {
        tracing_subscriber::fmt()
            .with_env_filter("yt_summarizer_rust=debug,info")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("yt_summarizer_rust=info,warn")
            .init();
    }

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }

    config.validate()?;

    if matches.get_flag("serve") {
        info!("🚀 YouTube Video Summarizer (Rust) starting in server mode...");
        info!("{}", config.summary());

        let port = config.server.port;
        let analyzer = Analyzer::new(&config)?;
        let observer = PageObserver::new();
        let server = ApiServer::new(Arc::new(analyzer), Arc::new(observer), port);
        server.start().await?;
        return Ok(());
    }

    // One-shot mode works from a saved page, a bare URL, or both.
    let url = matches.get_one::<String>("url").cloned();
    let html_path = matches.get_one::<String>("html").map(PathBuf::from);

    let mut video = match (&html_path, &url) {
        (Some(path), _) => {
            let html = tokio::fs::read_to_string(path).await?;
            info!("📄 Loaded watch page from {}", path.display());
            extract_video_context(&html, url.as_deref().unwrap_or(""))
        }
        (None, Some(url)) => {
            fetch_video_context(url, config.youtube.request_timeout_seconds).await?
        }
        (None, None) => {
            anyhow::bail!("Nothing to summarize: pass --url or --html (or --serve for the API)")
        }
    };

    if let Some(path) = matches.get_one::<String>("transcript") {
        video.raw_transcript_text = tokio::fs::read_to_string(path).await?;
        info!(
            "📄 Transcript loaded from {} ({} chars)",
            path,
            video.raw_transcript_text.chars().count()
        );
    }

    let analyzer = Analyzer::new(&config)?;

    let start_time = std::time::Instant::now();
    let analysis = analyzer.analyze(&video).await;
    let duration = start_time.elapsed();

    let rendered = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => render_json(&analysis)?,
        _ => render_markdown(&video, &analysis),
    };

    match matches.get_one::<String>("output") {
        Some(path) => {
            tokio::fs::write(path, &rendered).await?;
            info!("💾 Summary written to {}", path);
        }
        None => println!("{}", rendered),
    }

    info!(
        "🎉 Summarized in {:.2}s (transcript via {})",
        duration.as_secs_f64(),
        analysis.transcript_source
    );

    Ok(())
}
