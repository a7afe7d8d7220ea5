//! VinLens Lookup - VIN lookup orchestration.
//!
//! This crate queries third-party VIN data providers about a single vehicle.
//! It builds each provider's request from its definition, fetches the page
//! with a randomized client signature, extracts structured fields from the
//! returned HTML and collects one outcome per provider.
//!
//! # Features
//!
//! - Strictly sequential requests with a randomized pause between providers
//! - Per-request timeout and user agent rotation
//! - Declarative field extraction (labels, selectors, paired lists, tables)
//! - Per-provider failure isolation: one broken provider never hides the rest
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vinlens_core::LookupConfig;
//! use vinlens_lookup::LookupOrchestrator;
//! use vinlens_provider::ProviderRegistry;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(ProviderRegistry::builtin()?);
//! let orchestrator = LookupOrchestrator::from_config(registry, &LookupConfig::default())?;
//!
//! let report = orchestrator.lookup_all("1HGCM82633A004352").await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod adapter;
pub mod error;
#[allow(missing_docs)]
pub mod extractor;
#[allow(missing_docs)]
pub mod fetcher;
#[allow(missing_docs)]
pub mod fingerprint;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod pacing;
#[allow(missing_docs)]
pub mod report;
#[allow(missing_docs)]
pub mod request_builder;

pub use adapter::ProviderAdapter;
pub use error::{ExtractionError, FetchError, LookupError, Result};
pub use extractor::{extract_page, EquipmentItem, ExtractionResult, FieldValue};
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use fingerprint::UserAgentPool;
pub use orchestrator::LookupOrchestrator;
pub use pacing::{Pacer, PacingPolicy, TokioPacer};
pub use report::{FailureReason, LookupReport, ProviderOutcome};
pub use request_builder::{build_request, ProviderRequest};
