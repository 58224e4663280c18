use precis_common::Result;
use serde::{Deserialize, Serialize};

use crate::traits::LlmClient;

/// Abstract written by a language model over the same document text the
/// extractive summarizer sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmAbstract {
    pub classic_abstract: String,
    pub keyword_abstract: Vec<String>,
}

/// Issue the abstract and keyword prompts concurrently.
pub async fn llm_abstract(
    client: &dyn LlmClient,
    text: &str,
    abstract_size: usize,
) -> Result<LlmAbstract> {
    let started = std::time::Instant::now();
    let (classic_abstract, keyword_abstract) = futures::try_join!(
        client.write_abstract(text, abstract_size),
        client.list_keywords(text)
    )?;
    tracing::info!(
        model = client.model_name(),
        abstract_size,
        keywords = keyword_abstract.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "llm.abstract.complete"
    );
    Ok(LlmAbstract {
        classic_abstract,
        keyword_abstract,
    })
}
