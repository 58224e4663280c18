use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use precis_common::{PrecisError, Result};
use precis_http::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};

/// OpenAI-compatible gateway used when no base URL is configured.
pub const DEFAULT_OPENAI_BASE: &str = "https://openrouter.ai/api/v1/";

/// Client for any OpenAI-compatible `chat/completions` endpoint
/// (OpenAI, OpenRouter, local gateways).
pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    pub total_tokens: u32,
}

impl OpenAiClient {
    /// Create a client for `model`; `base_url` defaults to [`DEFAULT_OPENAI_BASE`].
    pub fn new(api_key: String, model: String, base_url: Option<&str>) -> Result<Self> {
        let mut base = base_url.unwrap_or(DEFAULT_OPENAI_BASE).trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let client = HttpClient::new(&base)
            .map_err(|e| PrecisError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(std::time::Duration::from_secs(120));

        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let req = ChatRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature,
        };

        let resp: ChatResponse = self
            .client
            .post_json("chat/completions", Some(&self.api_key), &req)
            .await
            .map_err(http_to_precis)?;

        let text = resp
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| PrecisError::Llm("completion had no content".into()))?;

        Ok(LlmResponse {
            text,
            model: resp.model,
            tokens_used: resp.usage.map(|u| u.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        match self.generate("Respond with just 'OK'", None, Some(5), Some(0.1)).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(model = %self.model, error = %e, "llm.openai.health_check_failed");
                Ok(false)
            }
        }
    }
}

fn http_to_precis(e: HttpError) -> PrecisError {
    PrecisError::Llm(e.to_string())
}
