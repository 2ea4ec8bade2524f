use crate::error::{AuditError, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Network side of an audit: page bodies and content-type probes.
pub trait PageFetcher {
    /// GET `url` and return its body. Non-success statuses are errors.
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String>> + Send;

    /// HEAD `url` and return its `content-type` header, if any.
    fn probe_content_type(&self, url: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("citeloop/0.1 (https://github.com/trapdoorsec/citeloop)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Fetch(format!("{} returned {}", url, status)));
        }

        Ok(response.text().await?)
    }

    async fn probe_content_type(&self, url: &str) -> Result<Option<String>> {
        debug!("Probing {}", url);
        let response = self.client.head(url).send().await?;

        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>hi</body></html>"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher
            .fetch_page(&format!("{}/article", mock_server.uri()))
            .await
            .unwrap();
        assert!(body.contains("hi"));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .fetch_page(&format!("{}/gone", mock_server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_probe_reads_content_type() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/paper.pdf"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let content_type = fetcher
            .probe_content_type(&format!("{}/paper.pdf", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(content_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_probe_unreachable_host_is_error() {
        let fetcher = HttpFetcher::with_timeout(1).unwrap();
        let result = fetcher.probe_content_type("http://127.0.0.1:1/").await;
        assert!(result.is_err());
    }
}
