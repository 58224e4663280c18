use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use precis_core::{assemble, checked_count, Summary};
use precis_llm::{llm_abstract, LlmAbstract};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct CreateAbstractQuery {
    pub url: String,
    /// Overrides the configured abstract size for this request.
    #[serde(default)]
    pub abstract_size: Option<i64>,
}

/// Both abstracts of one page.
#[derive(Debug, Serialize)]
pub struct CreateAbstractResponse {
    pub url: String,
    pub neural_network: Option<LlmAbstract>,
    pub sentence_extraction: Summary,
}

/// `GET /api/create-abstract?url=<url>[&abstract_size=<n>]`
///
/// Fetches the page, keeps the text of its `<p>` elements and runs the
/// extractive summarizer over it. When an LLM is configured it receives the
/// same assembled document.
pub async fn create_abstract(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<CreateAbstractQuery>, QueryRejection>,
) -> ServerResult<Json<CreateAbstractResponse>> {
    let Query(query) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let url = precis_web::validate_url(&query.url)
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;
    let abstract_size = match query.abstract_size {
        Some(raw) => checked_count("abstract_size", raw)?,
        None => state.extractor.config().abstract_size,
    };

    let started = Instant::now();
    let html = state
        .fetcher
        .fetch(&url)
        .await
        .map_err(|e| ServerError::Fetch(format!("{e:#}")))?;
    let blocks = precis_web::paragraphs(&html);
    let document = assemble(&blocks);

    let extractor = state.extractor.clone();
    let text = document.clone();
    let sentence_extraction =
        tokio::task::spawn_blocking(move || extractor.summarize_document(&text, abstract_size))
            .await
            .map_err(|e| ServerError::Internal(format!("summarizer task failed: {e}")))?;

    // Nothing to send to the model if no sentence survived assembly.
    let neural_network = match &state.llm {
        Some(llm) if !document.is_empty() => {
            Some(llm_abstract(llm.as_ref(), &document, abstract_size).await?)
        }
        _ => None,
    };

    tracing::info!(
        url = %url,
        paragraphs = blocks.len(),
        document_chars = document.len(),
        abstract_size,
        too_short = sentence_extraction.is_too_short(),
        with_llm = neural_network.is_some(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "server.create_abstract"
    );

    Ok(Json(CreateAbstractResponse {
        url: query.url,
        neural_network,
        sentence_extraction,
    }))
}
