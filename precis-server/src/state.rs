use precis_core::SentenceExtractor;
use precis_llm::traits::LlmClient;
use precis_web::PageFetcher;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub extractor: Arc<SentenceExtractor>,
    pub fetcher: Arc<dyn PageFetcher>,
    /// `None` when no provider is configured; responses then carry
    /// `neural_network: null`.
    pub llm: Option<Arc<dyn LlmClient>>,
    /// Directory that saved results are written into.
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl ServerState {
    pub fn new(
        extractor: SentenceExtractor,
        fetcher: Arc<dyn PageFetcher>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor: Arc::new(extractor),
            fetcher,
            llm: None,
            output_dir: output_dir.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
