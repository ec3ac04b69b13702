use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, ResponseFormat,
    },
};

use super::{GenerateRequest, GenerateResponse, Provider};

const JSON_ONLY_INSTRUCTION: &str =
    "Respond with a single JSON object only, without markdown fences or commentary.";

/// OpenAI chat completions, also used for OpenAI-compatible local servers (Ollama).
pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    provider_name: &'static str,
    server_address: String,
    server_port: i64,
}

impl OpenAIProvider {
    pub fn new(api_key: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            provider_name: "openai",
            server_address: "api.openai.com".to_string(),
            server_port: 443,
        }
    }

    pub fn new_ollama(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let config = OpenAIConfig::new()
            .with_api_key("ollama")
            .with_api_base(format!("{base_url}/v1"));
        let (server_address, server_port) = split_host_port(base_url, 11434);
        Self {
            client: Client::with_config(config),
            provider_name: "ollama",
            server_address,
            server_port,
        }
    }
}

fn split_host_port(base_url: &str, default_port: i64) -> (String, i64) {
    let authority = base_url
        .split("://")
        .nth(1)
        .unwrap_or(base_url)
        .split('/')
        .next()
        .unwrap_or_default();

    match authority.rsplit_once(':') {
        Some((host, port)) => (
            host.to_string(),
            port.parse().unwrap_or(default_port),
        ),
        None => (authority.to_string(), default_port),
    }
}

fn system_prompt(req: &GenerateRequest) -> String {
    match (req.json_mode, req.system.is_empty()) {
        (false, _) => req.system.clone(),
        (true, true) => JSON_ONLY_INSTRUCTION.to_string(),
        (true, false) => format!("{}\n{JSON_ONLY_INSTRUCTION}", req.system.trim_end()),
    }
}

fn build_request(req: &GenerateRequest) -> CreateChatCompletionRequest {
    let messages = vec![
        ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
            content: ChatCompletionRequestSystemMessageContent::Text(system_prompt(req)),
            name: None,
        }),
        ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(req.prompt.clone()),
            name: None,
        }),
    ];

    #[allow(deprecated)]
    let request = CreateChatCompletionRequest {
        model: req.model.clone(),
        messages,
        temperature: Some(req.temperature),
        max_completion_tokens: Some(req.max_tokens),
        response_format: req.json_mode.then_some(ResponseFormat::JsonObject),
        ..Default::default()
    };
    request
}

#[async_trait::async_trait]
impl Provider for OpenAIProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let request = build_request(req);
        let response = self.client.chat().create(request).await?;

        let choice = response.choices.first();
        let content = choice
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        let finish_reason = choice
            .and_then(|c| c.finish_reason)
            .map(|r| format!("{r:?}").to_lowercase())
            .unwrap_or_default();

        let (input_tokens, output_tokens) = response
            .usage
            .as_ref()
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        Ok(GenerateResponse {
            content,
            model: response.model,
            input_tokens,
            output_tokens,
            finish_reason,
        })
    }

    fn name(&self) -> &str {
        self.provider_name
    }

    fn server_address(&self) -> &str {
        &self.server_address
    }

    fn server_port(&self) -> i64 {
        self.server_port
    }
}
