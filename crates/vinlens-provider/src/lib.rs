//! VinLens Provider - Provider definition system for VIN lookups.
//!
//! This crate provides the types and functionality for managing the catalog of
//! third-party VIN data providers. Each provider pairs a request template with
//! an ordered list of declarative field rules; adding a provider means adding a
//! definition, never touching orchestration code.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed provider metadata, request templates and field rules
//! - **Loader** ([`loader`]): TOML file loading from `provider-definitions/` (shipped inside this crate)
//! - **Registry** ([`registry`]): Immutable, ordered catalog shared across lookups
//! - **Errors** ([`error`]): Provider-specific error types
//!
//! # Example
//!
//! ```rust
//! use vinlens_provider::ProviderRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistry::builtin()?;
//!
//! for provider in registry.list_providers() {
//!     println!("{} -> {}", provider.name(), provider.endpoint());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{
    FieldRule, HttpMethod, ProviderMetadata, ProviderSpec, RequestTemplate, VIN_PLACEHOLDER,
};
pub use error::{ProviderError, Result};
pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
