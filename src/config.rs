use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub llm_provider: String,
    pub llm_model: String,
    pub ollama_base_url: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub analysis_temperature: f32,
    pub analysis_max_tokens: u32,
    pub analysis_timeout: Duration,
    pub mock_item_count: usize,
    pub mock_latency: Duration,
    pub mock_seed: Option<u64>,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var_or(key, default)
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a number"))
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mock_seed = match env::var("MOCK_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .context("MOCK_SEED must be an unsigned integer")?,
            ),
            _ => None,
        };

        Ok(Self {
            port: parse_var("APP_PORT", "8080")?,
            environment: var_or("APP_ENVIRONMENT", "development"),
            llm_provider: var_or("LLM_PROVIDER", "google").to_lowercase(),
            llm_model: var_or("LLM_MODEL", "gemini-2.5-flash"),
            ollama_base_url: var_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            google_api_key: env::var("GOOGLE_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .ok(),
            analysis_temperature: parse_var("ANALYSIS_TEMPERATURE", "0.3")?,
            analysis_max_tokens: parse_var("ANALYSIS_MAX_TOKENS", "1024")?,
            analysis_timeout: Duration::from_secs(parse_var("ANALYSIS_TIMEOUT_SECS", "30")?),
            mock_item_count: parse_var("MOCK_ITEM_COUNT", "25")?,
            mock_latency: Duration::from_millis(parse_var("MOCK_LATENCY_MS", "800")?),
            mock_seed,
            otel_service_name: var_or("OTEL_SERVICE_NAME", "warehouse-report-generator"),
            otel_exporter_endpoint: var_or("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
