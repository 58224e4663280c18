//! Turns a loaded [`PrecisConfig`] into running services.

use anyhow::{Context, Result};
use precis_config::{PrecisConfig, PrecisConfigLoader};
use precis_core::{LanguageResources, SentenceExtractor};
use precis_llm::traits::LlmClient;
use precis_server::ServerState;
use precis_web::HttpPageFetcher;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "precis.yaml";

/// An explicit path must exist; otherwise `precis.yaml` is used when present.
pub fn load_config(path: Option<&Path>) -> Result<PrecisConfig> {
    let loader = match path {
        Some(p) => PrecisConfigLoader::new().with_file(p),
        None => PrecisConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("loading configuration")
}

pub fn build_extractor(cfg: &PrecisConfig) -> Result<SentenceExtractor> {
    let config = cfg
        .summarizer
        .extractor_config()
        .context("summarizer section")?;
    let resources = LanguageResources::load();
    Ok(SentenceExtractor::new(Arc::new(resources), config))
}

pub fn build_fetcher(cfg: &PrecisConfig) -> Result<HttpPageFetcher> {
    HttpPageFetcher::new(
        cfg.fetch.timeout(),
        cfg.fetch.retries,
        cfg.fetch.user_agent.as_deref(),
    )
    .context("fetch section")
}

/// `Ok(None)` when no provider is configured.
pub async fn build_llm(cfg: &PrecisConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    let llm_config = cfg.llm.to_llm_config();
    if !llm_config.is_enabled() {
        tracing::info!("app.llm.disabled");
        return Ok(None);
    }
    let client: Arc<dyn LlmClient> = precis_llm::ensure_llm_ready(&llm_config)
        .await
        .context("initialising LLM provider")?;
    tracing::info!(model = client.model_name(), "app.llm.ready");
    Ok(Some(client))
}

pub async fn build_state(cfg: &PrecisConfig) -> Result<ServerState> {
    let extractor = build_extractor(cfg)?;
    let fetcher = build_fetcher(cfg)?;
    let mut state = ServerState::new(extractor, Arc::new(fetcher), &cfg.server.output_dir)
        .with_request_timeout(Duration::from_secs(cfg.server.request_timeout_secs));
    if let Some(llm) = build_llm(cfg).await? {
        state = state.with_llm(llm);
    }
    Ok(state)
}
