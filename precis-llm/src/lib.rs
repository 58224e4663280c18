//! Provider‑agnostic LLM integration for Precis.
//!
//! This crate exposes a common [`traits::LlmClient`] interface, concrete
//! provider implementations for Ollama and OpenAI-compatible APIs, and
//! [`llm_abstract`], which asks a model for the same two abstracts the
//! extractive summarizer produces. [`ensure_llm_ready`] builds a client
//! from a [`precis_common::LlmConfig`].
//!
//! # Examples
//! ```no_run
//! use precis_common::{LlmConfig, Result};
//! use precis_llm::ensure_llm_ready;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let cfg = LlmConfig::OpenAi {
//!     api_key: "sk-...".into(),
//!     model: precis_llm::DEFAULT_OPENAI_MODEL.into(),
//!     base_url: None,
//! };
//! let client = ensure_llm_ready(&cfg).await?;
//! let result = precis_llm::llm_abstract(client.as_ref(), "Some long text.", 3).await?;
//! println!("{}", result.classic_abstract);
//! # Ok(())
//! # }
//! ```
pub mod abstracts;
pub mod ollama;
pub mod openai;
pub mod traits;

pub use abstracts::{llm_abstract, LlmAbstract};

use precis_common::{LlmConfig, PrecisError};
use std::sync::Arc;
use traits::LlmClient;

/// Default model recommendations
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_OPENAI_MODEL: &str = "nvidia/nemotron-nano-9b-v2:free";

/// Ensure an LLM client is ready (e.g., downloading models if needed).
pub async fn ensure_llm_ready(
    config: &LlmConfig,
) -> precis_common::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    match config {
        #[cfg(feature = "ollama")]
        LlmConfig::Ollama { base_url, model } => {
            let client = ollama::OllamaClient::new(base_url.clone(), model.clone()).await?;
            Ok(Arc::new(client))
        }
        #[cfg(feature = "openai")]
        LlmConfig::OpenAi {
            api_key,
            model,
            base_url,
        } => {
            if api_key.trim().is_empty() {
                return Err(PrecisError::Config("OpenAI api_key is empty".to_string()));
            }
            let client =
                openai::OpenAiClient::new(api_key.clone(), model.clone(), base_url.as_deref())?;
            Ok(Arc::new(client))
        }
        LlmConfig::None => Err(PrecisError::Config("No LLM configured".to_string())),
        #[allow(unreachable_patterns)]
        _ => Err(PrecisError::Config("LLM provider not enabled".to_string())),
    }
}
