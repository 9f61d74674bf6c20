pub mod providers;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generative-text provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    OpenAI,
}

impl ModelProvider {
    /// Environment variable holding the credential for this provider.
    pub fn key_env_var(&self) -> &'static str {
        match self {
            ModelProvider::Gemini => "GEMINI_API_KEY",
            ModelProvider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: ModelProvider,
    /// Endpoint override for OpenAI-compatible servers. Ignored by Gemini.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Gemini,
            endpoint: None,
            api_key: None,
            model: "gemini-pro".to_string(),
            max_tokens: 2048,
            temperature: 0.3,
            timeout_seconds: 60,
        }
    }
}

/// Reply from a generation request.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub tokens_used: Option<u32>,
}

/// A text-generation backend: one prompt in, generated text out.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<ModelReply>;

    fn provider(&self) -> ModelProvider;
}

/// Create a model client based on configuration.
pub fn create_model(config: &ModelConfig) -> Result<Box<dyn TextModel>> {
    match config.provider {
        ModelProvider::Gemini => Ok(Box::new(providers::GeminiModel::new(config.clone())?)),
        ModelProvider::OpenAI => Ok(Box::new(providers::OpenAIModel::new(config.clone())?)),
    }
}
