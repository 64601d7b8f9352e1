use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::fetcher::{
    decode::process_response,
    errors::FetchError,
    types::{MarkupSource, PageResponse},
};

/// Product pages serve full server-rendered markup to crawlers, so we
/// identify as one.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: u64,
    limiter: Arc<Semaphore>,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout())
            .timeout(config.fetch_timeout())
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static(ACCEPT_HTML),
                );
                headers
            })
            .build()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes(),
            limiter: Arc::new(Semaphore::new(config.outbound_concurrency())),
        })
    }

    /// Share an outbound concurrency cap with other upstream clients.
    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = limiter;
        self
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = url::Url::parse(url)?;

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > self.max_body_bytes
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let content_type = headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        // Content-Length may be missing or wrong for compressed bodies
        if body_bytes.len() as u64 > self.max_body_bytes {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        debug!(status = %status, bytes = body_bytes.len(), "fetched markup");

        Ok(process_response(
            final_url,
            status,
            headers,
            body_bytes,
            &content_type,
        ))
    }
}

#[async_trait]
impl MarkupSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        HttpFetcher::fetch(self, url).await
    }
}
