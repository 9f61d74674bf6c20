use crate::llm::{ModelConfig, ModelProvider};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the YouTube summarizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API settings
    #[serde(default)]
    pub youtube: YouTubeConfig,

    /// Generative model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Summary shaping settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API key for the YouTube Data API (never stored in source)
    pub api_key: Option<String>,

    /// Base URL for the YouTube Data API
    pub api_base: String,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Minimum spacing between kept timestamps, in seconds
    pub timestamp_threshold_seconds: u32,

    /// Maximum number of timestamp entries per summary
    pub max_timestamps: usize,

    /// Transcript characters included in the model prompt
    pub transcript_char_budget: usize,

    /// Number of related videos to fetch
    pub related_results: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP API
    pub port: u16,
}

impl Config {
    /// Load configuration from file, falling back to environment variables.
    pub fn load() -> Result<Self> {
        for path in Self::config_paths() {
            let config_str = match std::fs::read_to_string(&path) {
                Ok(s) => s,
                Err(_) => continue,
            };
            match toml::from_str::<Config>(&config_str) {
                Ok(mut config) => {
                    tracing::info!("📄 Loaded configuration from: {}", path.display());
                    config.apply_env_overrides();
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                }
            }
        }

        Self::from_env()
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("yt-summarizer.toml"),
            PathBuf::from("config/yt-summarizer.toml"),
        ];
        if let Ok(home) = std::env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/yt-summarizer/config.toml"));
        }
        paths.push(PathBuf::from("/etc/yt-summarizer/config.toml"));
        paths
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over file values so credentials can stay
    /// out of checked-in config files.
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(api_key);
        }

        if let Ok(api_key) = std::env::var(self.model.provider.key_env_var()) {
            self.model.api_key = Some(api_key);
        }

        if let Ok(model) = std::env::var("YT_SUMMARIZER_MODEL") {
            self.model.model = model;
        }

        if let Ok(port) = std::env::var("YT_SUMMARIZER_PORT") {
            self.server.port = port.parse().unwrap_or(self.server.port);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.summary.max_timestamps == 0 {
            return Err(anyhow!("max_timestamps must be greater than 0"));
        }

        if self.summary.transcript_char_budget == 0 {
            return Err(anyhow!("transcript_char_budget must be greater than 0"));
        }

        if self.summary.related_results == 0 {
            return Err(anyhow!("related_results must be greater than 0"));
        }

        if self.model.model.is_empty() {
            return Err(anyhow!("model name must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(anyhow!("temperature must be between 0.0 and 2.0"));
        }

        if self.server.port == 0 {
            return Err(anyhow!("server port must be greater than 0"));
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary. Keys are reported as set or
    /// unset, never echoed.
    pub fn summary(&self) -> String {
        format!(
            "YouTube Summarizer Configuration:\n\
            - Model Provider: {:?}\n\
            - Model: {}\n\
            - Model Key: {}\n\
            - YouTube API Key: {}\n\
            - Timestamp Threshold: {}s\n\
            - Max Timestamps: {}\n\
            - Transcript Budget: {} chars\n\
            - Server Port: {}",
            self.model.provider,
            self.model.model,
            key_state(&self.model.api_key),
            key_state(&self.youtube.api_key),
            self.summary.timestamp_threshold_seconds,
            self.summary.max_timestamps,
            self.summary.transcript_char_budget,
            self.server.port
        )
    }
}

fn key_state(key: &Option<String>) -> &'static str {
    match key {
        Some(k) if !k.is_empty() => "set",
        _ => "unset",
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YouTubeConfig::default(),
            model: ModelConfig::default(),
            summary: SummaryConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            timestamp_threshold_seconds: 30,
            max_timestamps: 10,
            transcript_char_budget: 4000,
            related_results: 3,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_youtube_api_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = Some(api_key);
        self
    }

    pub fn with_model_provider(mut self, provider: ModelProvider) -> Self {
        self.config.model.provider = provider;
        self
    }

    pub fn with_model_api_key(mut self, api_key: String) -> Self {
        self.config.model.api_key = Some(api_key);
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.config.model.model = model;
        self
    }

    pub fn with_timestamp_threshold(mut self, seconds: u32) -> Self {
        self.config.summary.timestamp_threshold_seconds = seconds;
        self
    }

    pub fn with_max_timestamps(mut self, max: usize) -> Self {
        self.config.summary.max_timestamps = max;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
