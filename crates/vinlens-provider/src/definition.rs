//! Provider definition types and structures.
//!
//! This module defines the data structures for provider definitions loaded
//! from TOML files: where to send the request and which field rules turn the
//! returned HTML into a normalized record.

use crate::error::{ProviderError, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use vinlens_core::ProviderId;

/// Placeholder substituted with the VIN when a request is built.
pub const VIN_PLACEHOLDER: &str = "{vin}";

/// Complete provider definition loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Core provider metadata
    pub provider: ProviderMetadata,

    /// Request template
    pub request: RequestTemplate,

    /// Ordered extraction rules applied to the response document
    pub field_rules: Vec<FieldRule>,
}

impl ProviderSpec {
    /// Get the provider ID.
    #[must_use]
    pub fn id(&self) -> &ProviderId {
        &self.provider.id
    }

    /// Get the provider name (unique key).
    #[must_use]
    pub fn name(&self) -> &str {
        self.provider.id.as_str()
    }

    /// Get the human-readable provider name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.provider.name
    }

    /// Get the endpoint URL template.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.request.endpoint
    }

    /// Get the HTTP method.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.request.method
    }

    /// Get the templated request parameters.
    #[must_use]
    pub fn request_params(&self) -> &IndexMap<String, String> {
        &self.request.params
    }

    /// Validate the provider definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.provider.name.trim().is_empty() {
            return Err(self.invalid("provider name cannot be empty"));
        }

        self.request.validate(&self.provider.id)?;

        if self.field_rules.is_empty() {
            return Err(self.invalid("at least one field rule is required"));
        }

        let mut seen = HashSet::new();
        for rule in &self.field_rules {
            if rule.field().trim().is_empty() {
                return Err(self.invalid("field rule name cannot be empty"));
            }
            if !seen.insert(rule.field()) {
                return Err(self.invalid(&format!("duplicate field rule '{}'", rule.field())));
            }
            rule.validate(&self.provider.id)?;
        }

        Ok(())
    }

    fn invalid(&self, reason: &str) -> ProviderError {
        ProviderError::ValidationError {
            provider_id: self.provider.id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Core provider metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Unique provider identifier (e.g., "vindecoderz")
    pub id: ProviderId,

    /// Human-readable provider name
    pub name: String,

    /// Date when the field rules were last checked against live markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<NaiveDate>,

    /// Free-form notes about the provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// HTTP method used to query a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Parameters are sent as a query string
    #[default]
    Get,
    /// Parameters are sent as a url-encoded form body
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Request shape for a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,

    /// Endpoint URL template (may contain `{vin}`)
    pub endpoint: String,

    /// Request parameters; values may contain `{vin}`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, String>,
}

impl RequestTemplate {
    /// Number of `{vin}` placeholders across the endpoint and parameters.
    #[must_use]
    pub fn vin_placeholder_count(&self) -> usize {
        self.endpoint.matches(VIN_PLACEHOLDER).count()
            + self
                .params
                .values()
                .map(|value| value.matches(VIN_PLACEHOLDER).count())
                .sum::<usize>()
    }

    fn validate(&self, provider_id: &ProviderId) -> Result<()> {
        let invalid = |reason: String| ProviderError::ValidationError {
            provider_id: provider_id.to_string(),
            reason,
        };

        if self.endpoint.trim().is_empty() {
            return Err(invalid("request.endpoint cannot be empty".to_string()));
        }

        // The placeholder is not a valid URL component, so check a rendered sample
        let sample = self.endpoint.replace(VIN_PLACEHOLDER, "VIN");
        let url = url::Url::parse(&sample)
            .map_err(|e| invalid(format!("request.endpoint is not a valid URL: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!(
                "request.endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.params.keys().any(|key| key.trim().is_empty()) {
            return Err(invalid("request.params keys cannot be empty".to_string()));
        }

        let placeholders = self.vin_placeholder_count();
        if placeholders != 1 {
            return Err(invalid(format!(
                "exactly one {VIN_PLACEHOLDER} placeholder is required, found {placeholders}"
            )));
        }

        Ok(())
    }
}

/// Declarative instruction for extracting one named field from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldRule {
    /// Text of the element following the first element whose text equals `label`
    ScalarByLabel {
        /// Output field name
        field: String,
        /// Label text to match (after trimming)
        label: String,
    },

    /// Text of the first element matching `selector`
    ScalarBySelector {
        /// Output field name
        field: String,
        /// CSS selector
        selector: String,
    },

    /// Texts of every element matching `selector`, in document order
    ListBySelector {
        /// Output field name
        field: String,
        /// CSS selector
        selector: String,
    },

    /// Two parallel selectors zipped into a mapping
    PairedList {
        /// Output field name
        field: String,
        /// Selector yielding the keys (terms)
        key_selector: String,
        /// Selector yielding the values (definitions)
        value_selector: String,
    },

    /// `{code, description}` records from the rows of the first matching table
    TableRows {
        /// Output field name
        field: String,
        /// Selector identifying the table
        table_selector: String,
    },
}

impl FieldRule {
    /// Output field name for this rule.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::ScalarByLabel { field, .. }
            | Self::ScalarBySelector { field, .. }
            | Self::ListBySelector { field, .. }
            | Self::PairedList { field, .. }
            | Self::TableRows { field, .. } => field,
        }
    }

    /// Short name of the rule kind, as written in definitions.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ScalarByLabel { .. } => "scalar-by-label",
            Self::ScalarBySelector { .. } => "scalar-by-selector",
            Self::ListBySelector { .. } => "list-by-selector",
            Self::PairedList { .. } => "paired-list",
            Self::TableRows { .. } => "table-rows",
        }
    }

    /// CSS selectors referenced by this rule.
    #[must_use]
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            Self::ScalarByLabel { .. } => vec![],
            Self::ScalarBySelector { selector, .. } | Self::ListBySelector { selector, .. } => {
                vec![selector.as_str()]
            }
            Self::PairedList {
                key_selector,
                value_selector,
                ..
            } => vec![key_selector.as_str(), value_selector.as_str()],
            Self::TableRows { table_selector, .. } => vec![table_selector.as_str()],
        }
    }

    fn validate(&self, provider_id: &ProviderId) -> Result<()> {
        if let Self::ScalarByLabel { label, field } = self {
            if label.trim().is_empty() {
                return Err(ProviderError::ValidationError {
                    provider_id: provider_id.to_string(),
                    reason: format!("field rule '{field}' has an empty label"),
                });
            }
        }

        for selector in self.selectors() {
            if let Err(e) = Selector::parse(selector) {
                return Err(ProviderError::ValidationError {
                    provider_id: provider_id.to_string(),
                    reason: format!(
                        "field rule '{}' has invalid selector '{selector}': {e}",
                        self.field()
                    ),
                });
            }
        }

        Ok(())
    }
}
