use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use precis_common::{PrecisError, Result};
use precis_http::{HttpClient, RequestOpts};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OLLAMA_CONNECTION_ERROR: &str = "No running Ollama server detected. Start it with: `ollama serve` (after installing). Install instructions: https://github.com/ollama/ollama";

/// Ollama client for local model inference.
///
/// Expects a running Ollama server (see https://github.com/ollama/ollama).
pub struct OllamaClient {
    client: HttpClient,
    model: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

impl OllamaClient {
    /// Create a new client and verify server/model availability.
    pub async fn new(base_url: String, model: String) -> Result<Self> {
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let client = HttpClient::new(&base)
            .map_err(|e| PrecisError::Config(format!("Failed to create HTTP client: {e}")))?
            .with_timeout(Duration::from_secs(300));

        let ollama_client = Self { client, model };
        let models = ollama_client.fetch_available_models().await?;
        if !models.contains(&ollama_client.model) {
            tracing::info!(model = %ollama_client.model, "llm.ollama.pulling_model");
            ollama_client.pull_model().await?;
        }
        Ok(ollama_client)
    }

    async fn fetch_available_models(&self) -> Result<Vec<String>> {
        let opts = RequestOpts {
            timeout: Some(Duration::from_secs(10)),
            retries: Some(0),
            ..Default::default()
        };
        let tags: TagsResponse = self
            .client
            .get_json("api/tags", opts)
            .await
            .map_err(|_| PrecisError::Llm(OLLAMA_CONNECTION_ERROR.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn pull_model(&self) -> Result<()> {
        let req = PullRequest {
            model: &self.model,
            stream: false,
        };
        let _: serde_json::Value = self
            .client
            .post_json("api/pull", None, &req)
            .await
            .map_err(|e| PrecisError::Llm(format!("Failed to pull model: {e}")))?;
        tracing::info!(model = %self.model, "llm.ollama.pulled_model");
        Ok(())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let req = GenerateRequest {
            model: &self.model,
            prompt,
            system: system_prompt,
            stream: false,
            options: GenerateOptions {
                temperature,
                num_predict: max_tokens,
            },
        };

        let resp: GenerateResponse = self
            .client
            .post_json("api/generate", None, &req)
            .await
            .map_err(|e| PrecisError::Llm(format!("Generate request failed: {e}")))?;

        Ok(LlmResponse {
            text: resp.response,
            model: Some(self.model.clone()),
            tokens_used: resp.eval_count,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.fetch_available_models().await.is_ok())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
