//! Turns one provider definition plus a VIN into a [`ProviderOutcome`].

use crate::error::FetchError;
use crate::extractor::extract_page;
use crate::fetcher::PageFetcher;
use crate::fingerprint::UserAgentPool;
use crate::report::{FailureReason, ProviderOutcome};
use crate::request_builder::build_request;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use vinlens_core::Vin;
use vinlens_provider::ProviderSpec;

/// Queries a single provider. Never fails: every problem becomes a
/// [`ProviderOutcome::Failure`].
#[derive(Clone)]
pub struct ProviderAdapter {
    fetcher: Arc<dyn PageFetcher>,
    user_agents: UserAgentPool,
    timeout: Duration,
}

impl ProviderAdapter {
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>, user_agents: UserAgentPool, timeout: Duration) -> Self {
        Self {
            fetcher,
            user_agents,
            timeout,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self, spec: &ProviderSpec, vin: &Vin) -> ProviderOutcome {
        let provider = spec.name();

        let request = match build_request(spec, vin, self.user_agents.pick()) {
            Ok(request) => request,
            Err(e) => {
                warn!(provider = %provider, "Could not build request: {}", e);
                let source = spec.endpoint().replace(vinlens_provider::VIN_PLACEHOLDER, vin.as_str());
                return ProviderOutcome::failure(FailureReason::InvalidRequest, e.to_string(), &source);
            }
        };
        let source = request.url.to_string();

        debug!(provider = %provider, user_agent = %request.user_agent, "Fetching {}", source);

        let fetched = tokio::time::timeout(self.timeout, self.fetcher.fetch(&request))
            .await
            .unwrap_or(Err(FetchError::Timeout(self.timeout)));

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                warn!(provider = %provider, "Request failed: {}", e);
                return ProviderOutcome::failure(FailureReason::NetworkError, e.to_string(), &source);
            }
        };

        if !page.is_success() {
            warn!(provider = %provider, status = page.status, "Provider returned non-success status");
            return ProviderOutcome::failure(
                FailureReason::HttpError,
                page.status.to_string(),
                &source,
            );
        }

        match extract_page(&page.body, &spec.field_rules) {
            Ok(data) => {
                debug!(provider = %provider, fields = data.len(), "Extraction succeeded");
                ProviderOutcome::Success { data, source }
            }
            Err(e) => {
                warn!(provider = %provider, "Extraction failed: {}", e);
                ProviderOutcome::failure(FailureReason::ExtractionError, e.to_string(), &source)
            }
        }
    }
}
