//! Lookup orchestrator for querying providers about one VIN.
//!
//! This module provides the `LookupOrchestrator`, which validates the VIN,
//! queries the selected providers strictly one after another with a randomized
//! pause between consecutive requests, and collects every outcome into a
//! [`LookupReport`].

use crate::adapter::ProviderAdapter;
use crate::error::Result;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::fingerprint::UserAgentPool;
use crate::pacing::{Pacer, PacingPolicy, TokioPacer};
use crate::report::LookupReport;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use vinlens_core::{LookupConfig, Vin};
use vinlens_provider::{ProviderRegistry, ProviderSpec};

/// Orchestrates lookups across the provider catalog.
pub struct LookupOrchestrator {
    /// Provider catalog
    registry: Arc<ProviderRegistry>,
    /// Fetch and extraction for a single provider
    adapter: ProviderAdapter,
    /// Bounds of the pause between providers
    pacing: PacingPolicy,
    /// Performs the pause
    pacer: Arc<dyn Pacer>,
}

impl LookupOrchestrator {
    /// Create an orchestrator with the default pacing and the tokio timer.
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, adapter: ProviderAdapter) -> Self {
        Self {
            registry,
            adapter,
            pacing: PacingPolicy::default(),
            pacer: Arc::new(TokioPacer),
        }
    }

    /// Wire up the production HTTP fetcher from configuration.
    pub fn from_config(registry: Arc<ProviderRegistry>, config: &LookupConfig) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.timeout())?);
        let user_agents = UserAgentPool::new(config.user_agents.iter().cloned())?;
        let adapter = ProviderAdapter::new(fetcher, user_agents, config.timeout());

        Ok(Self::new(registry, adapter).with_pacing(PacingPolicy::from_config(config)))
    }

    /// Set the bounds of the pause between providers.
    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replace the component that performs the pause.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Get the provider catalog.
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Query every registered provider.
    pub async fn lookup_all(&self, vin: &str) -> Result<LookupReport> {
        let providers = self.registry.list_providers().to_vec();
        self.lookup(vin, &providers).await
    }

    /// Query the named providers, in registry order.
    ///
    /// An empty selection means every registered provider. The VIN is checked
    /// first, then unknown names fail before any request is sent.
    pub async fn lookup_selected<S: AsRef<str>>(&self, vin: &str, names: &[S]) -> Result<LookupReport> {
        if names.is_empty() {
            return self.lookup_all(vin).await;
        }
        Vin::parse(vin)?;
        let providers = self.registry.select(names)?;
        self.lookup(vin, &providers).await
    }

    /// Query `providers` in the given order.
    ///
    /// Repeated names are queried once. The VIN is validated before any network activity. Individual provider
    /// failures are recorded in the report and never abort the lookup. A pause
    /// drawn from the pacing policy separates consecutive providers; none is
    /// taken after the last.
    pub async fn lookup(&self, vin: &str, providers: &[ProviderSpec]) -> Result<LookupReport> {
        let vin = Vin::parse(vin)?;

        // A provider named twice is queried once, at its first position
        let mut seen = HashSet::new();
        let providers: Vec<&ProviderSpec> = providers
            .iter()
            .filter(|&spec| seen.insert(spec.name()))
            .collect();

        info!(vin = %vin, providers = providers.len(), "Starting lookup");

        let mut report = LookupReport::new();
        for (idx, spec) in providers.into_iter().enumerate() {
            if idx > 0 {
                let delay = self.pacing.next_delay();
                debug!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Pausing before {}",
                    spec.name()
                );
                self.pacer.pause(delay).await;
            }

            let outcome = self.adapter.fetch(spec, &vin).await;
            report.insert(spec.name(), outcome);
        }

        info!(
            vin = %vin,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Lookup complete"
        );

        Ok(report)
    }
}
