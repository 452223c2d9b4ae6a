use addrkit_core::{ChatMessage, LLMProvider, LLMResponse, Usage};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::retry::{DEFAULT_DELAYS, retry_with_backoff};

pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
pub const DEFAULT_MODEL: &str = "qwen-flash";

/// Correction and completion prompts need little randomness.
const TEMPERATURE: f64 = 0.1;
const MAX_TOKENS: u32 = 500;

/// Chat client for Alibaba Cloud DashScope through its OpenAI-compatible API.
pub struct DashScopeProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl DashScopeProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating DashScopeProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Helper method to send a single request
    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_completion(&response)
    }
}

fn parse_completion(response: &serde_json::Value) -> anyhow::Result<LLMResponse> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
        .trim()
        .to_string();

    let count = |u: &serde_json::Map<String, serde_json::Value>, key: &str| {
        u32::try_from(u.get(key).and_then(serde_json::Value::as_u64).unwrap_or(0)).unwrap_or(0)
    };
    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: count(u, "prompt_tokens"),
        completion_tokens: count(u, "completion_tokens"),
        total_tokens: count(u, "total_tokens"),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for DashScopeProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = json!({
            "model": model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        info!("Sending request to DashScope API: model={}", model);

        let response = retry_with_backoff(|| self.try_send(&request), &DEFAULT_DELAYS).await?;

        info!("Received response from DashScope API");
        Ok(response)
    }

    fn get_default_model(&self) -> &str {
        &self.model
    }
}
