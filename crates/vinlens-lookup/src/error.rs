//! Error types for VIN lookups.

use std::time::Duration;
use thiserror::Error;

/// Errors that abort a whole lookup.
///
/// Per-provider failures never surface here; they are reported as
/// [`crate::ProviderOutcome::Failure`] entries instead.
#[derive(Debug, Error)]
pub enum LookupError {
    /// VIN rejected before any request was sent
    #[error("invalid VIN: {0}")]
    InvalidVin(String),

    /// Provider selection or catalog failure
    #[error("provider error: {0}")]
    Provider(#[from] vinlens_provider::ProviderError),

    /// No usable user agent configured
    #[error("invalid user agent pool: {0}")]
    UserAgents(String),

    /// HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),
}

impl From<vinlens_core::VinLensError> for LookupError {
    fn from(err: vinlens_core::VinLensError) -> Self {
        match err {
            vinlens_core::VinLensError::InvalidVin(reason) => Self::InvalidVin(reason),
            other => Self::InvalidVin(other.to_string()),
        }
    }
}

/// Transport-level failure while reaching a provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response within the request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Rendered endpoint is not a valid URL
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl {
        /// Endpoint after VIN substitution
        url: String,
        /// Parser message
        reason: String,
    },

    /// Connection, DNS or TLS failure, with its cause chain
    #[error("{0}")]
    Network(String),
}

/// Response received, but the expected structure is absent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// Body is empty or whitespace only
    #[error("response body is empty")]
    EmptyDocument,

    /// Label or selector matched nothing
    #[error("field '{field}' not found ({target})")]
    FieldNotFound {
        /// Output field name
        field: String,
        /// Label or selector that was searched for
        target: String,
    },

    /// No table matched the table selector
    #[error("field '{field}': no table matches '{selector}'")]
    TableNotFound {
        /// Output field name
        field: String,
        /// Table selector
        selector: String,
    },

    /// Key and value selectors matched different counts
    #[error("field '{field}': {keys} keys but {values} values")]
    MismatchedPairLength {
        /// Output field name
        field: String,
        /// Number of keys found
        keys: usize,
        /// Number of values found
        values: usize,
    },

    /// Selector does not parse
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// Selector text
        selector: String,
        /// Parser message
        reason: String,
    },
}

/// Result type alias using `LookupError`.
pub type Result<T> = std::result::Result<T, LookupError>;
