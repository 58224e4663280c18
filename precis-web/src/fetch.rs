use std::time::Duration;

use anyhow::{Context, Result};
use precis_http::{HttpClient, RequestOpts};
use url::Url;

#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Download the page body as text.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Fetcher backed by the retrying [`HttpClient`].
#[derive(Clone)]
pub struct HttpPageFetcher {
    http: HttpClient,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration, retries: usize, user_agent: Option<&str>) -> Result<Self> {
        // Requests always carry absolute URLs; the base is never joined.
        let mut http = HttpClient::new("http://localhost/")
            .context("building page fetch client")?
            .with_timeout(timeout)
            .with_retries(retries);
        if let Some(agent) = user_agent {
            http = http.with_user_agent(agent)?;
        }
        Ok(Self { http })
    }

    pub fn from_client(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let started = std::time::Instant::now();
        let html = self
            .http
            .get_text(url.as_str(), RequestOpts::absolute())
            .await
            .with_context(|| format!("fetching {url}"))?;
        tracing::info!(
            target: "web.fetch",
            url = %url,
            bytes = html.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "web.fetch.done"
        );
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_absolute_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/glaciers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Ice</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(Duration::from_secs(5), 0, Some("precis-test")).unwrap();
        let url = Url::parse(&format!("{}/news/glaciers", server.uri())).unwrap();
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<p>Ice</p>");
    }

    #[tokio::test]
    async fn http_errors_carry_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(Duration::from_secs(5), 0, None).unwrap();
        let url = Url::parse(&format!("{}/gone", server.uri())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(format!("{err:#}").contains("fetching"));
        assert!(format!("{err:#}").contains("404"));
    }
}
