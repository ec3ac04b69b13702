pub mod anthropic;
pub mod client;
pub mod gemini;
pub mod openai;

use std::sync::Arc;

pub use client::LlmClient;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a bare JSON object instead of free text.
    pub json_mode: bool,
    pub stage: String,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
    fn name(&self) -> &str;
    fn server_address(&self) -> &str;
    fn server_port(&self) -> i64 {
        443
    }
}

/// Builds the provider named by `LLM_PROVIDER`; unknown names resolve to Gemini.
pub fn provider_from_config(config: &Config) -> Arc<dyn Provider> {
    match config.llm_provider.as_str() {
        "openai" => Arc::new(openai::OpenAIProvider::new(
            config.openai_api_key.as_deref().unwrap_or(""),
        )),
        "anthropic" => Arc::new(anthropic::AnthropicProvider::new(
            config.anthropic_api_key.as_deref().unwrap_or(""),
        )),
        "ollama" => Arc::new(openai::OpenAIProvider::new_ollama(&config.ollama_base_url)),
        _ => Arc::new(gemini::GeminiProvider::new(
            config.google_api_key.as_deref().unwrap_or(""),
        )),
    }
}
