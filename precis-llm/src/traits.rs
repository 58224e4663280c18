use async_trait::async_trait;
use precis_common::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Check if the LLM service is available
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Ask for an abstract of `text` made of `abstract_size` sentences,
    /// written in the language of the text.
    async fn write_abstract(&self, text: &str, abstract_size: usize) -> Result<String> {
        let question = format!(
            "Write an abstract of the text which will consist of only so many: {abstract_size} sentences of the text, the abstract must be written in the same language as the original text."
        );
        let prompt = format!("{question}\n\n{text}");

        let response = self.generate(&prompt, None, None, Some(0.3)).await?;
        tracing::debug!(
            model = self.model_name(),
            chars = response.text.len(),
            "llm.abstract.done"
        );
        Ok(response.text.trim().to_string())
    }

    /// Ask for the key words of `text` as a bullet list.
    async fn list_keywords(&self, text: &str) -> Result<Vec<String>> {
        let question = "Write a summary of the text, which will consist only of a list of the most key words in the text and nothing more. Example: *word\n *word\n *word\n.";
        let prompt = format!("{question}\n\n{text}");

        let response = self.generate(&prompt, None, None, Some(0.3)).await?;
        let keywords = parse_bullets(&response.text);
        tracing::debug!(
            model = self.model_name(),
            keywords = keywords.len(),
            "llm.keywords.done"
        );
        Ok(keywords)
    }
}

/// Items of a `-`, `*` or `•` bullet list; other lines are ignored.
pub fn parse_bullets(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if !(trimmed.starts_with('-') || trimmed.starts_with('•') || trimmed.starts_with('*')) {
                return None;
            }
            let cleaned = trimmed
                .trim_start_matches(['-', '•', '*'])
                .trim_end_matches('*')
                .trim();
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        })
        .collect()
}
