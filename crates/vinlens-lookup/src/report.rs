//! Per-provider outcomes and the aggregate lookup report.

use crate::extractor::ExtractionResult;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a provider produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Connection, DNS, TLS or timeout failure
    NetworkError,
    /// Provider answered with a non-2xx status
    HttpError,
    /// Response arrived but the expected structure was missing
    ExtractionError,
    /// The definition did not yield a sendable request; nothing was sent
    InvalidRequest,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkError => write!(f, "NetworkError"),
            Self::HttpError => write!(f, "HttpError"),
            Self::ExtractionError => write!(f, "ExtractionError"),
            Self::InvalidRequest => write!(f, "InvalidRequest"),
        }
    }
}

/// Result of querying one provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Success {
        data: ExtractionResult,
        source: String,
    },
    Failure {
        reason: FailureReason,
        detail: String,
        source: String,
    },
}

impl ProviderOutcome {
    pub fn failure(reason: FailureReason, detail: impl Into<String>, source: &str) -> Self {
        Self::Failure {
            reason,
            detail: detail.into(),
            source: source.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Endpoint that was queried.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&ExtractionResult> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(*reason),
        }
    }

    /// `"<reason>: <detail>"` for failures.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, detail, .. } => Some(format!("{reason}: {detail}")),
        }
    }
}

impl Serialize for ProviderOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("success", &self.is_success())?;
        map.serialize_entry("source", self.source())?;
        match self {
            Self::Success { data, .. } => map.serialize_entry("data", data)?,
            Self::Failure { .. } => map.serialize_entry("error", &self.error_message())?,
        }
        map.end()
    }
}

/// Provider name → outcome, one entry per requested provider, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LookupReport {
    outcomes: IndexMap<String, ProviderOutcome>,
}

impl LookupReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, provider: &str, outcome: ProviderOutcome) {
        self.outcomes.insert(provider.to_string(), outcome);
    }

    #[must_use]
    pub fn get(&self, provider: &str) -> Option<&ProviderOutcome> {
        self.outcomes.get(provider)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderOutcome)> {
        self.outcomes.iter().map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}
