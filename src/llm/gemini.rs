use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{GenerateRequest, GenerateResponse, Provider};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini through its native `generateContent` endpoint, which
/// supports a JSON response mime type.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str) -> Self {
        Self::with_api_base(api_key, GEMINI_API_BASE)
    }

    pub fn with_api_base(api_key: &str, api_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

fn text_content(role: Option<&str>, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

fn build_request(req: &GenerateRequest) -> GeminiRequest {
    GeminiRequest {
        system_instruction: (!req.system.is_empty()).then(|| text_content(None, &req.system)),
        contents: vec![text_content(Some("user"), &req.prompt)],
        generation_config: GenerationConfig {
            temperature: req.temperature,
            max_output_tokens: req.max_tokens,
            response_mime_type: req.json_mode.then_some("application/json"),
        },
    }
}

#[async_trait::async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = format!("{}/models/{}:generateContent", self.api_base, req.model);

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&build_request(req))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<GeminiError>(&error_body)
                .map(|e| e.error.message)
                .unwrap_or(error_body);
            return Err(anyhow::anyhow!("Gemini API error ({status}): {detail}"));
        }

        let resp: GeminiResponse = response.json().await?;

        let candidate = resp.candidates.into_iter().next();
        let finish_reason = candidate
            .as_ref()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_default()
            .to_lowercase();
        let content = candidate
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let (input_tokens, output_tokens) = resp
            .usage_metadata
            .map(|u| (u.prompt_token_count, u.candidates_token_count))
            .unwrap_or((0, 0));

        Ok(GenerateResponse {
            content,
            model: resp.model_version.unwrap_or_else(|| req.model.clone()),
            input_tokens,
            output_tokens,
            finish_reason,
        })
    }

    fn name(&self) -> &str {
        "google"
    }

    fn server_address(&self) -> &str {
        "generativelanguage.googleapis.com"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json_mode: bool, system: &str) -> GenerateRequest {
        GenerateRequest {
            model: "gemini-2.5-flash".to_string(),
            system: system.to_string(),
            prompt: "analyze".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
            json_mode,
            stage: "analyze".to_string(),
        }
    }

    #[test]
    fn test_build_request_json_mode() {
        let body = serde_json::to_value(build_request(&request(true, "be brief"))).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "analyze");
    }

    #[test]
    fn test_build_request_plain_text_without_system() {
        let body = serde_json::to_value(build_request(&request(false, ""))).unwrap();
        assert!(body["generationConfig"].get("responseMimeType").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_response_shape() {
        let raw = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 40, "totalTokenCount": 160},
            "modelVersion": "gemini-2.5-flash"
        }"#;
        let resp: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.candidates.len(), 1);
        let usage = resp.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, 120);
        assert_eq!(usage.candidates_token_count, 40);
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let provider = GeminiProvider::with_api_base("key", "http://localhost:9999/v1beta/");
        assert_eq!(provider.api_base, "http://localhost:9999/v1beta");
    }
}
