//! Page retrieval.
//!
//! [`PageFetcher`] is the seam between the adapter and the network. The
//! production implementation is [`HttpFetcher`]; tests substitute their own.

use crate::error::{FetchError, LookupError, Result};
use crate::request_builder::ProviderRequest;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::error::Error as _;
use std::time::Duration;
use tracing::debug;
use vinlens_provider::HttpMethod;

/// A response as seen by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves provider pages.
///
/// Non-2xx responses are returned as pages, not errors; only transport
/// failures produce a [`FetchError`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &ProviderRequest) -> std::result::Result<FetchedPage, FetchError>;
}

/// `reqwest`-backed fetcher. One connection pool shared by every provider.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::HttpClient(e.to_string()))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &ProviderRequest) -> std::result::Result<FetchedPage, FetchError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url.clone()).query(&request.params),
            HttpMethod::Post => self.client.post(request.url.clone()).form(&request.params),
        };

        debug!("{} {}", request.method, request.url);

        let response = builder
            .header(USER_AGENT, &request.user_agent)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(&e))?;

        Ok(FetchedPage { status, body })
    }
}

impl HttpFetcher {
    fn classify(&self, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout(self.timeout);
        }

        // reqwest's top-level message omits the cause (DNS, refused, TLS)
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        FetchError::Network(message)
    }
}
