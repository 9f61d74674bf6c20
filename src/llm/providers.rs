use super::{ModelConfig, ModelProvider, ModelReply, TextModel};
use crate::error::{Result, SummarizerError};
use async_trait::async_trait;
use reqwest;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

fn build_client(service: &'static str, timeout_seconds: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|source| SummarizerError::ApiRequest { service, source })
}

async fn check_status(service: &'static str, response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(SummarizerError::ApiStatus { service, status, body })
}

/// Gemini model client
#[derive(Debug)]
pub struct GeminiModel {
    config: ModelConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: u32,
}

impl GeminiModel {
    pub fn new(config: ModelConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(SummarizerError::MissingCredential {
                env_var: ModelProvider::Gemini.key_env_var(),
            });
        }
        let client = build_client("Gemini", config.timeout_seconds)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<ModelReply> {
        let api_key = self.config.api_key.as_ref().ok_or(SummarizerError::MissingCredential {
            env_var: ModelProvider::Gemini.key_env_var(),
        })?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        };

        // Key travels in the query string, so the URL must never be logged.
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.config.model, api_key
        );

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| SummarizerError::ApiRequest { service: "Gemini", source })?;
        let response = check_status("Gemini", response).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|source| SummarizerError::ApiRequest { service: "Gemini", source })?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or(SummarizerError::EmptyModelResponse)?;

        if text.trim().is_empty() {
            return Err(SummarizerError::EmptyModelResponse);
        }

        let tokens_used = gemini_response.usage_metadata.map(|u| u.total_token_count);

        Ok(ModelReply { text, tokens_used })
    }

    fn provider(&self) -> ModelProvider {
        ModelProvider::Gemini
    }
}

/// OpenAI-compatible model client
#[derive(Debug)]
pub struct OpenAIModel {
    config: ModelConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    total_tokens: u32,
}

impl OpenAIModel {
    pub fn new(config: ModelConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(SummarizerError::MissingCredential {
                env_var: ModelProvider::OpenAI.key_env_var(),
            });
        }
        let client = build_client("OpenAI", config.timeout_seconds)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> &str {
        self.config
            .endpoint
            .as_deref()
            .unwrap_or("https://api.openai.com/v1/chat/completions")
    }
}

#[async_trait]
impl TextModel for OpenAIModel {
    async fn generate(&self, prompt: &str) -> Result<ModelReply> {
        let api_key = self.config.api_key.as_ref().ok_or(SummarizerError::MissingCredential {
            env_var: ModelProvider::OpenAI.key_env_var(),
        })?;

        let request = OpenAIRequest {
            model: self.config.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to OpenAI API");

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|source| SummarizerError::ApiRequest { service: "OpenAI", source })?;
        let response = check_status("OpenAI", response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|source| SummarizerError::ApiRequest { service: "OpenAI", source })?;

        let text = openai_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or(SummarizerError::EmptyModelResponse)?;

        if text.trim().is_empty() {
            return Err(SummarizerError::EmptyModelResponse);
        }

        let tokens_used = openai_response.usage.map(|u| u.total_tokens);

        Ok(ModelReply { text, tokens_used })
    }

    fn provider(&self) -> ModelProvider {
        ModelProvider::OpenAI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> ModelConfig {
        ModelConfig {
            api_key: Some("test-key".to_string()),
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let err = GeminiModel::new(ModelConfig::default()).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let blank = ModelConfig {
            api_key: Some(String::new()),
            ..ModelConfig::default()
        };
        assert!(GeminiModel::new(blank).is_err());
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = ModelConfig {
            provider: ModelProvider::OpenAI,
            ..ModelConfig::default()
        };
        let err = OpenAIModel::new(config).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_gemini_request_wire_shape() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: "Summarize this".to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: 2048,
                temperature: 0.3,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Summarize this");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_gemini_response_parsing() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"summary\": \"ok\"}"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 117}
        }"#;

        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .unwrap();
        assert_eq!(text, "{\"summary\": \"ok\"}");
        assert_eq!(parsed.usage_metadata.unwrap().total_token_count, 117);
    }

    #[test]
    fn test_gemini_response_without_candidates() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn test_clients_build_with_key() {
        assert!(GeminiModel::new(keyed_config()).is_ok());

        let config = ModelConfig {
            provider: ModelProvider::OpenAI,
            endpoint: Some("http://localhost:1234/v1/chat/completions".to_string()),
            ..keyed_config()
        };
        let model = OpenAIModel::new(config).unwrap();
        assert_eq!(model.endpoint(), "http://localhost:1234/v1/chat/completions");
    }
}
