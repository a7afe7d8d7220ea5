//! Error types for the provider subsystem.

use thiserror::Error;

/// Errors that can occur in provider catalog operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider definition not found
    #[error("provider definition not found: {provider_id}")]
    NotFound {
        /// The provider ID that was not found
        provider_id: String,
    },

    /// Two definitions share the same provider ID
    #[error("duplicate provider definition: {provider_id}")]
    DuplicateProvider {
        /// The repeated provider ID
        provider_id: String,
    },

    /// Failed to load provider definition from file
    #[error("failed to load provider definition from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse provider definition TOML
    #[error("failed to parse provider definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid provider definition (validation failed)
    #[error("invalid provider definition for {provider_id}: {reason}")]
    ValidationError {
        /// Provider ID being validated
        provider_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Provider definition directory not found
    #[error("provider definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing provider definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid provider ID format
    #[error("invalid provider ID: {0}")]
    InvalidId(#[from] vinlens_core::VinLensError),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
